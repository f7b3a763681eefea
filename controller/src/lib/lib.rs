pub mod config;

pub mod domain {
    pub mod lifecycle {
        pub mod models {
            pub mod error;
            pub mod operations;
            pub mod request;
        }
        pub mod ports;
        pub mod service;
    }
}

pub mod inbound {
    pub mod server;
}

pub mod outbound {
    pub mod binder;
    pub mod graphql;
}
