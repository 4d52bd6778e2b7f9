use chatlens_core::{CachedState, FetchPlanInput, FetchPlanResult, is_running_status};

/// Decides whether the tool-call list of a session should be fetched.
///
/// Collapsed panels and missing sessions never fetch. A running task always refetches
/// with `force` set; otherwise a fetch happens only for a cold or stale cache that is
/// not already loading.
pub fn compute_fetch_plan(input: &FetchPlanInput) -> FetchPlanResult {
    if !input.has_session() || !input.is_expanded {
        return FetchPlanResult::skip();
    }
    if is_running_status(&input.status) {
        return FetchPlanResult::forced();
    }
    match input.cached_state {
        CachedState::Loading => FetchPlanResult::skip(),
        CachedState::Ok if input.cached_data_ok => FetchPlanResult::skip(),
        CachedState::Idle | CachedState::Ok => FetchPlanResult::fetch(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input(
        session_id: Option<&str>,
        status: &str,
        cached_state: CachedState,
        cached_data_ok: bool,
        is_expanded: bool,
    ) -> FetchPlanInput {
        FetchPlanInput {
            session_id: session_id.map(str::to_string),
            status: status.to_string(),
            cached_state,
            cached_data_ok,
            is_expanded,
        }
    }

    fn cached_state_strategy() -> impl Strategy<Value = CachedState> {
        prop_oneof![
            Just(CachedState::Idle),
            Just(CachedState::Loading),
            Just(CachedState::Ok),
        ]
    }

    fn input_strategy() -> impl Strategy<Value = FetchPlanInput> {
        (
            prop::option::of(prop_oneof![Just(String::new()), "[a-z0-9-]{1,12}"]),
            prop_oneof![
                Just("running".to_string()),
                Just("  RUNNING ".to_string()),
                Just("done".to_string()),
                "[a-zA-Z ]{0,10}",
            ],
            cached_state_strategy(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(
                |(session_id, status, cached_state, cached_data_ok, is_expanded)| FetchPlanInput {
                    session_id,
                    status,
                    cached_state,
                    cached_data_ok,
                    is_expanded,
                },
            )
    }

    proptest! {
        #[test]
        fn force_implies_fetch(input in input_strategy()) {
            let plan = compute_fetch_plan(&input);
            prop_assert!(!plan.force() || plan.should_fetch());
        }

        #[test]
        fn missing_session_or_collapsed_never_fetches(mut input in input_strategy(), drop_session in any::<bool>()) {
            if drop_session {
                input.session_id = None;
            } else {
                input.is_expanded = false;
            }
            prop_assert_eq!(compute_fetch_plan(&input), FetchPlanResult::skip());
        }

        #[test]
        fn running_ignores_cache(
            cached_state in cached_state_strategy(),
            cached_data_ok in any::<bool>(),
            left_ws in 0usize..3,
            right_ws in 0usize..3,
        ) {
            let status = format!("{}RuNnInG{}", " ".repeat(left_ws), " ".repeat(right_ws));
            let plan = compute_fetch_plan(&input(Some("session-123"), &status, cached_state, cached_data_ok, true));
            prop_assert_eq!(plan, FetchPlanResult::forced());
        }

        #[test]
        fn loading_never_fetches_when_not_running(cached_data_ok in any::<bool>()) {
            let plan = compute_fetch_plan(&input(Some("session-123"), "done", CachedState::Loading, cached_data_ok, true));
            prop_assert_eq!(plan, FetchPlanResult::skip());
        }
    }

    #[test]
    fn no_fetch_without_session() {
        let plan = compute_fetch_plan(&input(None, "running", CachedState::Idle, false, true));
        assert!(!plan.should_fetch());
        assert!(!plan.force());
    }

    #[test]
    fn no_fetch_for_empty_session_id() {
        let plan = compute_fetch_plan(&input(Some(""), "running", CachedState::Idle, false, true));
        assert_eq!(plan, FetchPlanResult::skip());
    }

    #[test]
    fn no_fetch_when_collapsed() {
        let plan = compute_fetch_plan(&input(
            Some("session-123"),
            "done",
            CachedState::Idle,
            false,
            false,
        ));
        assert_eq!(plan, FetchPlanResult::skip());
    }

    #[test]
    fn running_forces_fetch_over_good_cache() {
        let plan = compute_fetch_plan(&input(
            Some("session-123"),
            "running",
            CachedState::Ok,
            true,
            true,
        ));
        assert!(plan.should_fetch());
        assert!(plan.force());
    }

    #[test]
    fn good_cache_is_trusted() {
        let plan = compute_fetch_plan(&input(
            Some("session-123"),
            "done",
            CachedState::Ok,
            true,
            true,
        ));
        assert_eq!(plan, FetchPlanResult::skip());
    }

    #[test]
    fn loading_cache_skips() {
        let plan = compute_fetch_plan(&input(
            Some("session-123"),
            "done",
            CachedState::Loading,
            false,
            true,
        ));
        assert_eq!(plan, FetchPlanResult::skip());
    }

    #[test]
    fn cold_cache_fetches_once() {
        let plan = compute_fetch_plan(&input(
            Some("session-123"),
            "done",
            CachedState::Idle,
            false,
            true,
        ));
        assert!(plan.should_fetch());
        assert!(!plan.force());
    }

    #[test]
    fn ok_state_with_bad_data_refetches() {
        let plan = compute_fetch_plan(&input(
            Some("session-123"),
            "error",
            CachedState::Ok,
            false,
            true,
        ));
        assert_eq!(plan, FetchPlanResult::fetch());
    }

    #[test]
    fn status_case_and_whitespace_are_ignored() {
        for status in ["RUNNING", "  running  ", "Running\n"] {
            let plan = compute_fetch_plan(&input(
                Some("session-123"),
                status,
                CachedState::Idle,
                false,
                true,
            ));
            assert_eq!(plan, FetchPlanResult::forced(), "status {status:?}");
        }
    }

    #[test]
    fn unknown_status_falls_through_to_cache_rules() {
        let plan = compute_fetch_plan(&input(
            Some("session-123"),
            "queued-for-review",
            CachedState::Idle,
            true,
            true,
        ));
        assert_eq!(plan, FetchPlanResult::fetch());
    }
}
