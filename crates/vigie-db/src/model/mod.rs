pub mod grant;
pub mod principal;
