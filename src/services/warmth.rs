//! Relationship warmth scoring
//!
//! One continuous value per contact in [0, 100], decaying exponentially
//! between touchpoints and boosted when an interaction is logged. Decay is
//! lazy: nothing recomputes in the background, so a stored value only moves
//! when a caller runs decay-then-apply on the next interaction. Both
//! functions are pure and total — malformed timestamps degrade to "no decay
//! applied", never to NaN or a panic.

use std::sync::OnceLock;

use chrono::DateTime;
use regex::Regex;

use crate::model::{Channel, Interaction};

/// Decay time constant: one tau of silence reduces warmth to ~37%.
pub const DEFAULT_TAU_DAYS: f64 = 60.0;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Birthday congratulations earn a bonus; the Russian forms cover both the
/// full phrase and the standalone "др" abbreviation.
fn birthday_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)(birthday|день рождения|\bдр\b)").unwrap())
}

fn parse_millis(iso: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|t| t.timestamp_millis())
}

/// Exponential decay of `previous` over the interval between the two
/// timestamps. A negative interval is treated as zero; unparseable
/// timestamps leave the value untouched.
pub fn decay(previous: f64, last_at_iso: &str, now_iso: &str, tau_days: f64) -> f64 {
    let (Some(last), Some(now)) = (parse_millis(last_at_iso), parse_millis(now_iso)) else {
        return previous;
    };
    let dt_days = ((now - last) as f64 / MS_PER_DAY).max(0.0);
    previous * (-dt_days / tau_days).exp()
}

/// Warmth after logging an interaction: decay from the interaction date to
/// now, then add the channel bonus (meeting 25, call/chat 15, email/other
/// 8), +10 for a completed next step, +10 for a birthday congratulation in
/// the summary. Rounded and clamped to [0, 100].
pub fn apply_interaction(previous: f64, interaction: &Interaction, now_iso: &str) -> i64 {
    let mut add = match interaction.channel {
        Channel::Meeting => 25.0,
        Channel::Call | Channel::Chat => 15.0,
        Channel::Email | Channel::Other => 8.0,
    };
    if interaction.next_step_done {
        add += 10.0;
    }
    if birthday_pattern().is_match(interaction.summary.as_deref().unwrap_or("")) {
        add += 10.0;
    }

    let decayed = decay(previous, &interaction.date, now_iso, DEFAULT_TAU_DAYS);
    (decayed + add).round().clamp(0.0, 100.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Channel, Interaction};

    const NOW: &str = "2024-03-01T00:00:00.000Z";

    fn interaction(channel: Channel, date: &str) -> Interaction {
        Interaction {
            id: "i1".to_string(),
            contact_id: "c1".to_string(),
            date: date.to_string(),
            channel,
            channel_note: None,
            duration_minutes: None,
            summary: None,
            usefulness: None,
            keep_in_touch: false,
            ally_potential: false,
            next_step: None,
            next_step_due: None,
            next_step_done: false,
        }
    }

    #[test]
    fn test_decay_one_tau() {
        // 60 days at tau=60 is exactly one e-folding: 80 * e^-1
        let v = decay(80.0, "2024-01-01T00:00:00.000Z", "2024-03-01T00:00:00.000Z", 60.0);
        assert!((v - 80.0 * (-1.0f64).exp()).abs() < 1e-9);
        assert!((v - 29.43).abs() < 0.01);
    }

    #[test]
    fn test_decay_zero_interval_is_identity() {
        assert_eq!(decay(80.0, NOW, NOW, 60.0), 80.0);
    }

    #[test]
    fn test_decay_clamps_negative_interval() {
        // last-event timestamp in the future: treated as zero elapsed
        let v = decay(80.0, "2024-06-01T00:00:00.000Z", NOW, 60.0);
        assert_eq!(v, 80.0);
    }

    #[test]
    fn test_decay_malformed_timestamps_are_a_no_op() {
        assert_eq!(decay(80.0, "not-a-date", NOW, 60.0), 80.0);
        assert_eq!(decay(80.0, NOW, "", 60.0), 80.0);
    }

    #[test]
    fn test_meeting_from_cold_start() {
        let v = apply_interaction(0.0, &interaction(Channel::Meeting, NOW), NOW);
        assert_eq!(v, 25);
    }

    #[test]
    fn test_channel_bonuses() {
        assert_eq!(apply_interaction(0.0, &interaction(Channel::Call, NOW), NOW), 15);
        assert_eq!(apply_interaction(0.0, &interaction(Channel::Chat, NOW), NOW), 15);
        assert_eq!(apply_interaction(0.0, &interaction(Channel::Email, NOW), NOW), 8);
        assert_eq!(apply_interaction(0.0, &interaction(Channel::Other, NOW), NOW), 8);
    }

    #[test]
    fn test_bonuses_stack_on_decayed_value() {
        // 80 decayed over one tau (~29.43) + call 15 + next step 10 = ~54
        let mut i = interaction(Channel::Call, "2024-01-01T00:00:00.000Z");
        i.next_step_done = true;
        let v = apply_interaction(80.0, &i, NOW);
        assert_eq!(v, 54);
    }

    #[test]
    fn test_birthday_bonus() {
        let mut i = interaction(Channel::Chat, NOW);
        i.summary = Some("Called to wish a happy BIRTHDAY".to_string());
        assert_eq!(apply_interaction(0.0, &i, NOW), 25);

        i.summary = Some("поздравил с день рождения".to_string());
        assert_eq!(apply_interaction(0.0, &i, NOW), 25);

        i.summary = Some("поздравил с др".to_string());
        assert_eq!(apply_interaction(0.0, &i, NOW), 25);

        // "др" must stand alone as a word
        i.summary = Some("обсудили другой проект".to_string());
        assert_eq!(apply_interaction(0.0, &i, NOW), 15);
    }

    #[test]
    fn test_result_clamped_to_hundred() {
        let v = apply_interaction(95.0, &interaction(Channel::Meeting, NOW), NOW);
        assert_eq!(v, 100);
    }

    #[test]
    fn test_malformed_interaction_date_skips_decay() {
        let v = apply_interaction(40.0, &interaction(Channel::Email, "garbage"), NOW);
        assert_eq!(v, 48);
    }
}
