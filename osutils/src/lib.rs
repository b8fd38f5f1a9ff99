pub mod exe;
pub mod xnbd_client;
pub mod xnbd_wrapper;
pub mod xnbd_wrapper_ctl;

#[cfg(any(test, feature = "test-utilities"))]
pub mod testutils;
