//! Request middleware applied in front of every action.

pub mod auth;
