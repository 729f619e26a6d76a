pub mod observer;
pub mod realtime;
pub mod remote;
pub mod storage;
