mod helpers;

mod actions_test;
mod poller_test;
