pub mod waitlistdtos;
