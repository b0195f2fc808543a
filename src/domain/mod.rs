pub mod new_subscriber;
pub mod pagination;
pub mod subscriber;
pub mod subscriber_email;
