pub mod credentials;
pub mod errors;
pub mod execute;
pub mod http_request;
pub mod http_request_executor;
pub mod response;
