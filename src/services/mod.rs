pub mod request_service;
