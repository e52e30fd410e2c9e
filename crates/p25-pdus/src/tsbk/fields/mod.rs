pub mod service_options;
