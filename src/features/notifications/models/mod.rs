mod notification;

pub use notification::{DeliveryMethod, Notification, NotificationType};
