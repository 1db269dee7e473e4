pub mod activity_events;
