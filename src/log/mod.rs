pub mod click_log;
