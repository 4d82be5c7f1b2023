pub mod burndown;
pub mod doctor;
pub mod init;
pub mod sprint;
