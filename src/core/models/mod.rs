pub mod key_record;
