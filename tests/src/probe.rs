mod integration;
mod peer;
