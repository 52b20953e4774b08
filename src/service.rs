pub mod error;
pub mod referral;
pub mod waitlist_service;
