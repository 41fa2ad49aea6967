pub mod mailer;
pub mod notification_service;
pub mod order_service;
