// Kept in sync by hand with `repository::context::init_schema`.

diesel::table! {
    notices (id) {
        id -> BigInt,
        url -> Text,
        title -> Text,
        agency -> Text,
        posted_date -> Text,
        end_date -> Nullable<Text>,
        category -> Text,
        subcategory -> Text,
        relevance -> Integer,
        status -> Text,
        source -> Text,
        crawled_at -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    excluded_notices (id) {
        id -> BigInt,
        user_id -> BigInt,
        notice_url -> Text,
        reason -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    crawl_logs (id) {
        id -> BigInt,
        source -> Text,
        total_count -> Integer,
        new_count -> Integer,
        crawled_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(notices, excluded_notices, crawl_logs);
