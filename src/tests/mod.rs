mod metrics_integration;
