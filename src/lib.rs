pub mod configuration;
pub mod contact_client;
pub mod contact_form;
pub mod domain;
pub mod mail_transport;
pub mod routes;
pub mod startup;
pub mod telemetry;
