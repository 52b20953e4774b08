pub mod waitlistmodel;
