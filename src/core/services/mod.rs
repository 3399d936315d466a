pub mod encoder;
pub mod import_service;
pub mod validator;
