pub mod grant;
pub mod hierarchy;
pub mod ownership;
pub mod principal;
