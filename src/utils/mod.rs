pub mod punch_lock;
