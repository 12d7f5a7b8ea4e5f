// Database schema for the trainer store
diesel::table! {
    trainers (username) {
        username -> Text,        // Trainer name, the record key
        data -> Text,            // Full profile as a JSON document
        last_played -> Timestamp,
    }
}
