use crate::domain::subscriber_email::SubscriberEmail;

/// A stored subscription. `id` is assigned by the database on insert and follows
/// insertion order.
#[derive(Debug, serde::Serialize)]
pub struct Subscriber {
    pub id: i64,
    pub email: SubscriberEmail,
}
