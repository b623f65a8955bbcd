pub mod client_provider;
pub mod kube_client;
pub mod kube_resources;
pub mod pods;
