use crate::error::ReqHelperError;

pub fn exit_code_for_error(err: &ReqHelperError) -> i32 {
    match err {
        ReqHelperError::RequestConstruction(_) => 3,
        ReqHelperError::Transport(err) => transport_exit_code(err),
        ReqHelperError::Decode { .. } => 61,
        ReqHelperError::Json(_) => 26,
    }
}

fn transport_exit_code(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        return 28;
    }
    if err.is_connect() {
        return 7;
    }
    if err.is_builder() || err.is_request() {
        return 2;
    }
    56
}
