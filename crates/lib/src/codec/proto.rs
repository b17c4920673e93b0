//! Wire messages for the binary user export.
//!
//! Hand-derived `prost` messages matching `proto/user.proto`. Field tags are
//! part of the wire contract and must not be renumbered.

/// A single user as it appears on the wire.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct User {
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub email: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub role: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub status: ::prost::alloc::string::String,
    /// ISO-8601 / RFC 3339 UTC timestamp
    #[prost(string, tag = "5")]
    pub created_at: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub email_hash: ::prost::alloc::string::String,
    #[prost(string, tag = "7")]
    pub signature: ::prost::alloc::string::String,
}

/// Envelope holding every exported user.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UserList {
    #[prost(message, repeated, tag = "1")]
    pub users: ::prost::alloc::vec::Vec<User>,
}
