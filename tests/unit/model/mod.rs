mod test_gateway;
mod test_retry;
