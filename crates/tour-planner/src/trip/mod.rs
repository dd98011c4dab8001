// Trip parameters: the request payload and the form that builds it.

pub mod form;
pub mod request;
