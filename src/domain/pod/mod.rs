pub mod pod_filter;
pub mod pod_filter_service;
pub mod selection_criteria;
