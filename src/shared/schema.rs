diesel::table! {
    tickets (id) {
        id -> Uuid,
        #[max_length = 80]
        title -> Varchar,
        description -> Text,
        #[max_length = 20]
        status -> Varchar,
        #[max_length = 20]
        priority -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        #[max_length = 100]
        author_name -> Varchar,
        #[max_length = 500]
        message -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(comments -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(tickets, comments);
