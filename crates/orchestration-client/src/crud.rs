//! Resource addressing tree for the orchestration API
//!
//! Every handle is a `{base_url, transport}` pair: operations compose a
//! URI and delegate one request to the transport, and navigation returns
//! a child handle one path level down without touching the network.
//! Nothing here validates ids or body shapes; the server owns those
//! semantics and its errors pass through unchanged.

use serde_json::Value;
use std::sync::Arc;

use crate::error::Result;
use crate::transport::{Method, Transport};

/// One addressable resource in the orchestration API
///
/// The generic primitive under the typed handles: a URL prefix plus the
/// transport used to reach it. Handles are immutable and cheap to clone.
#[derive(Clone)]
pub struct ResourceHandle {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl ResourceHandle {
    /// Create a handle addressing `base_url`
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// The URL prefix this handle addresses
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A handle one path level down, sharing this handle's transport
    pub fn child(&self, path: &str) -> ResourceHandle {
        ResourceHandle {
            base_url: format!("{}/{}", self.base_url, path),
            transport: Arc::clone(&self.transport),
        }
    }

    /// Compose the target URI and delegate one request to the transport
    ///
    /// The URI is always `{base_url}/{route}`; an empty `route` therefore
    /// yields the base URL with a trailing slash, which is how the
    /// orchestration server addresses individual resources.
    pub async fn request(&self, method: Method, route: &str, body: Option<Value>) -> Result<Value> {
        let uri = format!("{}/{}", self.base_url, route);
        self.transport.send(method, &uri, body).await
    }
}

/// Client for the orchestration API resource tree
///
/// Rooted at the API base URL (`http://host:port/v1`). Operations return
/// the server's JSON response unmodified; navigation methods return typed
/// handles on nested resources and perform no request themselves.
#[derive(Clone)]
pub struct Crud {
    handle: ResourceHandle,
}

impl Crud {
    /// Create a client rooted at `base_url`
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            handle: ResourceHandle::new(base_url, transport),
        }
    }

    /// The API base URL this client is rooted at
    pub fn base_url(&self) -> &str {
        self.handle.base_url()
    }

    /// Orchestration server metadata (`GET /`)
    pub async fn info(&self) -> Result<Value> {
        self.handle.request(Method::Get, "", None).await
    }

    /// Database releases the server can launch (`GET /releases`)
    pub async fn releases(&self) -> Result<Value> {
        self.handle.request(Method::Get, "releases", None).await
    }

    /// List standalone servers (`GET /servers`)
    pub async fn servers(&self) -> Result<Value> {
        self.handle.request(Method::Get, "servers", None).await
    }

    /// Launch a standalone server, id assigned by the orchestration
    /// server (`POST /servers`)
    pub async fn create_server(&self, body: Value) -> Result<Value> {
        self.handle.request(Method::Post, "servers", Some(body)).await
    }

    /// Launch the standalone server named `id` (`PUT /servers/{id}`)
    pub async fn upsert_server(&self, id: &str, body: Value) -> Result<Value> {
        self.handle
            .request(Method::Put, &format!("servers/{id}"), Some(body))
            .await
    }

    /// Handle on the standalone server named `id`
    pub fn server(&self, id: &str) -> ServerHandle {
        ServerHandle {
            handle: self.handle.child(&format!("servers/{id}")),
        }
    }

    /// Launch a replica set, id assigned by the orchestration server
    /// (`POST /replica_sets`)
    pub async fn create_replica_set(&self, body: Value) -> Result<Value> {
        self.handle
            .request(Method::Post, "replica_sets", Some(body))
            .await
    }

    /// Launch the replica set named `id` (`PUT /replica_sets/{id}`)
    pub async fn upsert_replica_set(&self, id: &str, body: Value) -> Result<Value> {
        self.handle
            .request(Method::Put, &format!("replica_sets/{id}"), Some(body))
            .await
    }

    /// Handle on the replica set named `id`
    pub fn replica_set(&self, id: &str) -> ReplicaSetHandle {
        ReplicaSetHandle {
            handle: self.handle.child(&format!("replica_sets/{id}")),
        }
    }

    /// Launch a sharded cluster, id assigned by the orchestration server
    /// (`POST /sharded_clusters`)
    pub async fn create_sharded_cluster(&self, body: Value) -> Result<Value> {
        self.handle
            .request(Method::Post, "sharded_clusters", Some(body))
            .await
    }

    /// Launch the sharded cluster named `id` (`PUT /sharded_clusters/{id}`)
    pub async fn upsert_sharded_cluster(&self, id: &str, body: Value) -> Result<Value> {
        self.handle
            .request(Method::Put, &format!("sharded_clusters/{id}"), Some(body))
            .await
    }

    /// Handle on the sharded cluster named `id`
    pub fn sharded_cluster(&self, id: &str) -> ShardedClusterHandle {
        ShardedClusterHandle {
            handle: self.handle.child(&format!("sharded_clusters/{id}")),
        }
    }
}

/// Handle on one standalone server
#[derive(Clone)]
pub struct ServerHandle {
    handle: ResourceHandle,
}

impl ServerHandle {
    /// The URL prefix this handle addresses
    pub fn base_url(&self) -> &str {
        self.handle.base_url()
    }

    /// This server's status document
    pub async fn info(&self) -> Result<Value> {
        self.handle.request(Method::Get, "", None).await
    }

    /// Run a control action against this server, e.g. `{"action": "stop"}`
    pub async fn command(&self, body: Value) -> Result<Value> {
        self.handle.request(Method::Post, "", Some(body)).await
    }

    /// Shut this server down and release its resources
    pub async fn remove(&self) -> Result<Value> {
        self.handle.request(Method::Delete, "", None).await
    }
}

/// Handle on one replica set
#[derive(Clone)]
pub struct ReplicaSetHandle {
    handle: ResourceHandle,
}

impl ReplicaSetHandle {
    /// The URL prefix this handle addresses
    pub fn base_url(&self) -> &str {
        self.handle.base_url()
    }

    /// This replica set's status document
    pub async fn info(&self) -> Result<Value> {
        self.handle.request(Method::Get, "", None).await
    }

    /// Run a control action against this replica set
    pub async fn command(&self, body: Value) -> Result<Value> {
        self.handle.request(Method::Post, "", Some(body)).await
    }

    /// Shut this replica set down and release its resources
    pub async fn remove(&self) -> Result<Value> {
        self.handle.request(Method::Delete, "", None).await
    }

    /// Add a member with the given config (`POST .../members`)
    pub async fn add_member(&self, body: Value) -> Result<Value> {
        self.handle.request(Method::Post, "members", Some(body)).await
    }

    /// List this replica set's members (`GET .../members`)
    pub async fn members(&self) -> Result<Value> {
        self.handle.request(Method::Get, "members", None).await
    }

    /// Handle on the member named `id`
    pub fn member(&self, id: &str) -> MemberHandle {
        MemberHandle {
            handle: self.handle.child(&format!("members/{id}")),
        }
    }

    /// List the underlying server resources (`GET .../servers`)
    pub async fn servers(&self) -> Result<Value> {
        self.handle.request(Method::Get, "servers", None).await
    }

    /// The current primary (`GET .../primary`)
    pub async fn primary(&self) -> Result<Value> {
        self.handle.request(Method::Get, "primary", None).await
    }

    /// The current secondaries (`GET .../secondaries`)
    pub async fn secondaries(&self) -> Result<Value> {
        self.handle.request(Method::Get, "secondaries", None).await
    }

    /// The arbiter members (`GET .../arbiters`)
    pub async fn arbiters(&self) -> Result<Value> {
        self.handle.request(Method::Get, "arbiters", None).await
    }

    /// The hidden members (`GET .../hidden`)
    pub async fn hidden(&self) -> Result<Value> {
        self.handle.request(Method::Get, "hidden", None).await
    }
}

/// Handle on one replica set member
#[derive(Clone)]
pub struct MemberHandle {
    handle: ResourceHandle,
}

impl MemberHandle {
    /// The URL prefix this handle addresses
    pub fn base_url(&self) -> &str {
        self.handle.base_url()
    }

    /// This member's status document
    pub async fn info(&self) -> Result<Value> {
        self.handle.request(Method::Get, "", None).await
    }

    /// Reconfigure this member, e.g. `{"rsParams": {"priority": 2}}`
    pub async fn configure(&self, body: Value) -> Result<Value> {
        self.handle.request(Method::Patch, "", Some(body)).await
    }

    /// Remove this member from the replica set
    pub async fn remove(&self) -> Result<Value> {
        self.handle.request(Method::Delete, "", None).await
    }
}

/// Handle on one sharded cluster
#[derive(Clone)]
pub struct ShardedClusterHandle {
    handle: ResourceHandle,
}

impl ShardedClusterHandle {
    /// The URL prefix this handle addresses
    pub fn base_url(&self) -> &str {
        self.handle.base_url()
    }

    /// This cluster's status document
    pub async fn info(&self) -> Result<Value> {
        self.handle.request(Method::Get, "", None).await
    }

    /// Run a control action against this cluster
    pub async fn command(&self, body: Value) -> Result<Value> {
        self.handle.request(Method::Post, "", Some(body)).await
    }

    /// Shut this cluster down and release its resources
    pub async fn remove(&self) -> Result<Value> {
        self.handle.request(Method::Delete, "", None).await
    }

    /// Add a shard with the given config (`POST .../shards`)
    pub async fn add_shard(&self, body: Value) -> Result<Value> {
        self.handle.request(Method::Post, "shards", Some(body)).await
    }

    /// List this cluster's shards (`GET .../shards`)
    pub async fn shards(&self) -> Result<Value> {
        self.handle.request(Method::Get, "shards", None).await
    }

    /// Handle on the shard named `id`
    pub fn shard(&self, id: &str) -> ShardHandle {
        ShardHandle {
            handle: self.handle.child(&format!("shards/{id}")),
        }
    }

    /// List this cluster's config servers (`GET .../configsvrs`)
    pub async fn config_servers(&self) -> Result<Value> {
        self.handle.request(Method::Get, "configsvrs", None).await
    }

    /// Add a router with the given config (`POST .../routers`)
    pub async fn add_router(&self, body: Value) -> Result<Value> {
        self.handle.request(Method::Post, "routers", Some(body)).await
    }

    /// List this cluster's routers (`GET .../routers`)
    pub async fn routers(&self) -> Result<Value> {
        self.handle.request(Method::Get, "routers", None).await
    }

    /// Handle on the router named `id`
    pub fn router(&self, id: &str) -> RouterHandle {
        RouterHandle {
            handle: self.handle.child(&format!("routers/{id}")),
        }
    }
}

/// Handle on one shard of a sharded cluster
#[derive(Clone)]
pub struct ShardHandle {
    handle: ResourceHandle,
}

impl ShardHandle {
    /// The URL prefix this handle addresses
    pub fn base_url(&self) -> &str {
        self.handle.base_url()
    }

    /// This shard's status document
    pub async fn info(&self) -> Result<Value> {
        self.handle.request(Method::Get, "", None).await
    }

    /// Remove this shard from the cluster
    pub async fn remove(&self) -> Result<Value> {
        self.handle.request(Method::Delete, "", None).await
    }
}

/// Handle on one router (mongos) of a sharded cluster
#[derive(Clone)]
pub struct RouterHandle {
    handle: ResourceHandle,
}

impl RouterHandle {
    /// The URL prefix this handle addresses
    pub fn base_url(&self) -> &str {
        self.handle.base_url()
    }

    /// Remove this router from the cluster
    pub async fn remove(&self) -> Result<Value> {
        self.handle.request(Method::Delete, "", None).await
    }
}
