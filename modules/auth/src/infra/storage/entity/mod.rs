pub mod customer;
pub mod customer_contact;
pub mod login_history;
pub mod staff;
pub mod tenant;
