use super::*;
use crate::state::session::SessionStatus;

fn state(status: SessionStatus) -> SessionState {
    let mut state = SessionState::default();
    state.status = status;
    state
}

#[test]
fn no_redirect_before_session_is_read() {
    assert_eq!(guard_redirect(&state(SessionStatus::Unknown), "/dashboard"), None);
    assert_eq!(guard_redirect(&state(SessionStatus::Unknown), "/login"), None);
}

#[test]
fn signed_out_dashboard_goes_to_login() {
    assert_eq!(guard_redirect(&state(SessionStatus::Unauthenticated), "/dashboard"), Some("/login"));
}

#[test]
fn signed_in_login_goes_to_dashboard() {
    assert_eq!(guard_redirect(&state(SessionStatus::Authenticated), "/login"), Some("/dashboard"));
}

#[test]
fn signed_in_dashboard_stays() {
    assert_eq!(guard_redirect(&state(SessionStatus::Authenticated), "/dashboard"), None);
}
