//! Tests for the goal service.

#[cfg(test)]
mod tests {
    use crate::constants::GOAL_NOT_FOUND;
    use crate::errors::{Error, Result};
    use crate::goals::{
        Goal, GoalProgressUpdate, GoalRepositoryTrait, GoalService, GoalServiceTrait, GoalType,
        NewGoal, ProgressDerivation,
    };
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::{Arc, RwLock};

    // ============== Mock Repository ==============

    #[derive(Default)]
    struct MockGoalRepository {
        goals: RwLock<Vec<Goal>>,
    }

    impl MockGoalRepository {
        fn with_goals(goals: Vec<Goal>) -> Self {
            Self {
                goals: RwLock::new(goals),
            }
        }

        fn stored(&self, goal_id: &str) -> Option<Goal> {
            self.goals
                .read()
                .unwrap()
                .iter()
                .find(|g| g.id == goal_id)
                .cloned()
        }
    }

    #[async_trait]
    impl GoalRepositoryTrait for MockGoalRepository {
        fn load_goals_for_user(&self, user_id: &str) -> Result<Vec<Goal>> {
            Ok(self
                .goals
                .read()
                .unwrap()
                .iter()
                .filter(|g| g.user_id == user_id)
                .cloned()
                .collect())
        }

        fn find_goal_for_user(&self, goal_id: &str, user_id: &str) -> Result<Option<Goal>> {
            Ok(self
                .goals
                .read()
                .unwrap()
                .iter()
                .find(|g| g.id == goal_id && g.user_id == user_id)
                .cloned())
        }

        async fn insert_goal(&self, goal: Goal) -> Result<Goal> {
            self.goals.write().unwrap().push(goal.clone());
            Ok(goal)
        }

        async fn save_goal(&self, goal: Goal) -> Result<Goal> {
            let mut goals = self.goals.write().unwrap();
            let slot = goals
                .iter_mut()
                .find(|g| g.id == goal.id && g.user_id == goal.user_id)
                .ok_or_else(|| Error::NotFound(GOAL_NOT_FOUND.to_string()))?;
            *slot = goal.clone();
            Ok(goal)
        }

        async fn delete_goal_for_user(&self, goal_id: String, user_id: String) -> Result<usize> {
            let mut goals = self.goals.write().unwrap();
            let before = goals.len();
            goals.retain(|g| !(g.id == goal_id && g.user_id == user_id));
            Ok(before - goals.len())
        }
    }

    /// Reports `current_value / target_value` as a percentage, unclamped.
    struct RatioDerivation;

    impl ProgressDerivation for RatioDerivation {
        fn derive(&self, goal: &Goal) -> f64 {
            match goal.target_value {
                Some(target) if target > 0.0 => goal.current_value / target * 100.0,
                _ => goal.progress,
            }
        }
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn goal(id: &str, user_id: &str, goal_type: GoalType) -> Goal {
        Goal {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: format!("Goal {id}"),
            description: None,
            goal_type,
            current_value: 3.0,
            target_value: Some(10.0),
            progress: 30.0,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn service(goals: Vec<Goal>) -> (Arc<MockGoalRepository>, GoalService<MockGoalRepository>) {
        let repo = Arc::new(MockGoalRepository::with_goals(goals));
        (repo.clone(), GoalService::new(repo))
    }

    fn progress(value: f64) -> GoalProgressUpdate {
        GoalProgressUpdate {
            current_value: None,
            progress: Some(value),
        }
    }

    fn current(value: f64) -> GoalProgressUpdate {
        GoalProgressUpdate {
            current_value: Some(value),
            progress: None,
        }
    }

    // ============== Milestone goals ==============

    #[tokio::test]
    async fn milestone_progress_above_range_is_stored_as_100() {
        let (repo, service) = service(vec![goal("g1", "alice", GoalType::Milestone)]);

        let updated = service
            .update_progress("alice", "g1", progress(150.0))
            .await
            .unwrap();

        assert_eq!(updated.progress, 100.0);
        assert_eq!(repo.stored("g1").unwrap().progress, 100.0);
    }

    #[tokio::test]
    async fn milestone_progress_below_range_is_stored_as_0() {
        let (repo, service) = service(vec![goal("g1", "alice", GoalType::Milestone)]);

        let updated = service
            .update_progress("alice", "g1", progress(-20.0))
            .await
            .unwrap();

        assert_eq!(updated.progress, 0.0);
        assert_eq!(repo.stored("g1").unwrap().progress, 0.0);
    }

    #[tokio::test]
    async fn milestone_ignores_current_value() {
        let (_, service) = service(vec![goal("g1", "alice", GoalType::Milestone)]);

        let updated = service
            .update_progress("alice", "g1", current(99.0))
            .await
            .unwrap();

        assert_eq!(updated.current_value, 3.0);
        assert_eq!(updated.progress, 30.0);
    }

    // ============== Numeric / habit goals ==============

    #[tokio::test]
    async fn numeric_current_value_is_overwritten() {
        let (repo, service) = service(vec![goal("g1", "alice", GoalType::Numeric)]);

        let updated = service
            .update_progress("alice", "g1", current(7.5))
            .await
            .unwrap();

        assert_eq!(updated.current_value, 7.5);
        assert_eq!(repo.stored("g1").unwrap().current_value, 7.5);
    }

    #[tokio::test]
    async fn habit_ignores_direct_progress() {
        let (_, service) = service(vec![goal("g1", "alice", GoalType::Habit)]);

        let updated = service
            .update_progress("alice", "g1", progress(90.0))
            .await
            .unwrap();

        assert_eq!(updated.progress, 30.0);
        assert_eq!(updated.current_value, 3.0);
    }

    #[tokio::test]
    async fn omitted_current_value_leaves_prior_value() {
        let (_, service) = service(vec![goal("g1", "alice", GoalType::Habit)]);

        let updated = service
            .update_progress("alice", "g1", GoalProgressUpdate::default())
            .await
            .unwrap();

        assert_eq!(updated.current_value, 3.0);
        assert!(updated.updated_at > timestamp());
    }

    #[tokio::test]
    async fn derivation_recomputes_progress_and_is_clamped() {
        let repo = Arc::new(MockGoalRepository::with_goals(vec![goal(
            "g1",
            "alice",
            GoalType::Numeric,
        )]));
        let service = GoalService::with_derivation(repo, Arc::new(RatioDerivation));

        let halfway = service
            .update_progress("alice", "g1", current(5.0))
            .await
            .unwrap();
        assert_eq!(halfway.progress, 50.0);

        let overshoot = service
            .update_progress("alice", "g1", current(25.0))
            .await
            .unwrap();
        assert_eq!(overshoot.progress, 100.0);
    }

    // ============== Ownership ==============

    #[tokio::test]
    async fn foreign_goal_is_indistinguishable_from_missing() {
        let (repo, service) = service(vec![goal("g1", "alice", GoalType::Milestone)]);

        let foreign = service
            .update_progress("mallory", "g1", progress(80.0))
            .await
            .unwrap_err();
        let missing = service
            .update_progress("mallory", "nope", progress(80.0))
            .await
            .unwrap_err();

        assert!(matches!(foreign, Error::NotFound(_)));
        assert_eq!(foreign.to_string(), missing.to_string());
        assert_eq!(foreign.to_string(), GOAL_NOT_FOUND);
        assert_eq!(repo.stored("g1").unwrap().progress, 30.0);
    }

    #[tokio::test]
    async fn get_goals_only_returns_callers_goals() {
        let (_, service) = service(vec![
            goal("g1", "alice", GoalType::Numeric),
            goal("g2", "bob", GoalType::Habit),
            goal("g3", "alice", GoalType::Milestone),
        ]);

        let ids: Vec<String> = service
            .get_goals("alice")
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();

        assert_eq!(ids, vec!["g1".to_string(), "g3".to_string()]);
    }

    #[tokio::test]
    async fn delete_foreign_goal_is_not_found() {
        let (repo, service) = service(vec![goal("g1", "alice", GoalType::Numeric)]);

        let err = service.delete_goal("bob", "g1").await.unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert!(repo.stored("g1").is_some());
        service.delete_goal("alice", "g1").await.unwrap();
        assert!(repo.stored("g1").is_none());
    }

    // ============== Creation ==============

    #[tokio::test]
    async fn create_goal_trims_title_and_clamps_progress() {
        let (_, service) = service(vec![]);

        let created = service
            .create_goal(
                "alice",
                NewGoal {
                    title: "  Launch the side project ".to_string(),
                    description: None,
                    goal_type: GoalType::Milestone,
                    current_value: None,
                    target_value: None,
                    progress: Some(120.0),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.title, "Launch the side project");
        assert_eq!(created.user_id, "alice");
        assert_eq!(created.progress, 100.0);
        assert!(!created.id.is_empty());
    }

    #[tokio::test]
    async fn create_goal_rejects_blank_title() {
        let (repo, service) = service(vec![]);

        let err = service
            .create_goal(
                "alice",
                NewGoal {
                    title: "   ".to_string(),
                    description: None,
                    goal_type: GoalType::Habit,
                    current_value: None,
                    target_value: None,
                    progress: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(repo.load_goals_for_user("alice").unwrap().is_empty());
    }

    // ============== Request body parsing ==============

    #[test]
    fn progress_update_ignores_invalid_fields() {
        let update = GoalProgressUpdate::from_json_body(br#"{"currentValue":"12","progress":40}"#);
        assert_eq!(update.current_value, None);
        assert_eq!(update.progress, Some(40.0));

        let garbage = GoalProgressUpdate::from_json_body(b"not json");
        assert!(garbage.is_empty());

        let array = GoalProgressUpdate::from_json_body(b"[1,2,3]");
        assert!(array.is_empty());
    }
}
