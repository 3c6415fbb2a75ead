//! Tests for goal domain models.

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::goals::{GoalDescription, GoalInstance, GoalPeriodUnit, GoalType};

    fn description() -> GoalDescription {
        GoalDescription {
            id: "desc-1".to_string(),
            goal_type: GoalType::NonSpecific,
            repeat: true,
            period_count: 1,
            period_unit: GoalPeriodUnit::Day,
            archived: false,
            paused: false,
            deleted: false,
            created_at: Utc.with_ymd_and_hms(2024, 6, 5, 10, 0, 0).unwrap(),
            library_item_ids: vec![],
        }
    }

    fn instance() -> GoalInstance {
        GoalInstance {
            id: "inst-1".to_string(),
            description_id: "desc-1".to_string(),
            start_timestamp: Utc.with_ymd_and_hms(2024, 6, 4, 22, 0, 0).unwrap(),
            period_in_seconds: 24 * 3600,
            target_seconds: 3600,
            progress_seconds: 0,
            renewed: false,
            deleted: false,
            created_at: Utc.with_ymd_and_hms(2024, 6, 5, 10, 0, 0).unwrap(),
        }
    }

    // ==================== Enum Serialization Tests ====================

    #[test]
    fn test_goal_type_serialization() {
        assert_eq!(
            serde_json::to_string(&GoalType::NonSpecific).unwrap(),
            "\"NON_SPECIFIC\""
        );
        assert_eq!(
            serde_json::to_string(&GoalType::ItemSpecific).unwrap(),
            "\"ITEM_SPECIFIC\""
        );
        assert_eq!(
            serde_json::from_str::<GoalType>("\"ITEM_SPECIFIC\"").unwrap(),
            GoalType::ItemSpecific
        );
        assert_eq!(GoalType::default(), GoalType::NonSpecific);
    }

    #[test]
    fn test_period_unit_serialization() {
        assert_eq!(
            serde_json::to_string(&GoalPeriodUnit::Week).unwrap(),
            "\"WEEK\""
        );
        assert_eq!(
            serde_json::from_str::<GoalPeriodUnit>("\"MONTH\"").unwrap(),
            GoalPeriodUnit::Month
        );
        assert_eq!(GoalPeriodUnit::default(), GoalPeriodUnit::Day);
    }

    // ==================== Window Tests ====================

    #[test]
    fn test_end_timestamp_is_start_plus_period() {
        let instance = instance();
        assert_eq!(
            instance.end_timestamp(),
            instance.start_timestamp + Duration::days(1)
        );
    }

    #[test]
    fn test_is_outdated_at_exact_window_end() {
        let instance = instance();
        let end = instance.end_timestamp();

        assert!(!instance.is_outdated(end - Duration::seconds(1)));
        // the window is half-open: at its exact end the instance is expired
        assert!(instance.is_outdated(end));
        assert!(instance.is_outdated(end + Duration::seconds(1)));
    }

    #[test]
    fn test_renewed_instance_is_never_outdated() {
        let mut instance = instance();
        instance.renewed = true;
        assert!(!instance.is_outdated(instance.end_timestamp() + Duration::days(30)));
    }

    // ==================== Renewal Eligibility Tests ====================

    #[test]
    fn test_renews_requires_repeat_and_active_flags() {
        let description = description();
        assert!(description.renews());

        let mut archived = description.clone();
        archived.archived = true;
        assert!(!archived.renews());

        let mut paused = description.clone();
        paused.paused = true;
        assert!(!paused.renews());

        let mut one_shot = description;
        one_shot.repeat = false;
        assert!(!one_shot.renews());
    }
}
