//! Result-screen wording.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackTier {
    Perfect,
    High,
    Mid,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub tier: FeedbackTier,
    pub title: &'static str,
    pub message: &'static str,
    pub icon: &'static str,
}

pub fn tier_for(percent: u32) -> FeedbackTier {
    match percent {
        p if p >= 100 => FeedbackTier::Perfect,
        p if p >= 80 => FeedbackTier::High,
        p if p >= 60 => FeedbackTier::Mid,
        _ => FeedbackTier::Low,
    }
}

pub fn feedback_for(percent: u32) -> Feedback {
    let tier = tier_for(percent);
    let (title, message, icon) = match tier {
        FeedbackTier::Perfect => ("Master!", "You answered without a single mistake!", "🏆"),
        FeedbackTier::High => ("Excellent!", "An excellent result!", "🎉"),
        FeedbackTier::Mid => ("Good", "Solid knowledge!", "👍"),
        FeedbackTier::Low => ("Try again", "There is room to grow!", "📚"),
    };
    Feedback { tier, title, message, icon }
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(tier_for(100), FeedbackTier::Perfect);
        assert_eq!(tier_for(99), FeedbackTier::High);
        assert_eq!(tier_for(80), FeedbackTier::High);
        assert_eq!(tier_for(79), FeedbackTier::Mid);
        assert_eq!(tier_for(60), FeedbackTier::Mid);
        assert_eq!(tier_for(59), FeedbackTier::Low);
        assert_eq!(tier_for(0), FeedbackTier::Low);
    }

    #[test]
    fn feedback_carries_icon() {
        let f = feedback_for(100);
        assert_eq!(f.icon, "🏆");
        assert_eq!(f.title, "Master!");
    }

    #[test]
    fn time_is_zero_padded() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(600), "10:00");
    }
}
