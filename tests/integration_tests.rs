//! Integration tests for the GraphDB provider.
//!
//! The `wire` scenarios run the provider against an `httpmock` server and
//! check the exact requests it sends. The `live` scenarios need a real
//! GraphDB instance:
//! ```bash
//! GRAPHDB_INTEGRATION_TESTS=1 GRAPHDB_HOST=localhost GRAPHDB_USERNAME=admin GRAPHDB_PASSWORD=root \
//!     cargo test --test integration_tests -- --ignored
//! ```

use std::env;
use std::sync::Arc;

use graphdb_provider::testing::MockGraphDb;
use graphdb_provider::{
    ConnectionConfig, DataSource, Error, GraphDbProvider, ImportableResource, RepositoryConfig,
    Resource, Role, UserConfig, UserSummary,
};

/// Check if integration tests should run.
fn should_run_integration_tests() -> bool {
    env::var("GRAPHDB_INTEGRATION_TESTS").map_or(false, |v| v == "1")
}

const TEST_REPO_CONFIG: &str = r#"@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix rep: <http://www.openrdf.org/config/repository#> .
@prefix sr: <http://www.openrdf.org/config/repository/sail#> .
@prefix sail: <http://www.openrdf.org/config/sail#> .
@prefix graphdb: <http://www.ontotext.com/config/graphdb#> .

[] a rep:Repository ;
    rep:repositoryID "TestRepo" ;
    rdfs:label "Test repository" ;
    rep:repositoryImpl [
        rep:repositoryType "graphdb:SailRepository" ;
        sr:sailImpl [
            sail:sailType "graphdb:Sail" ;
            graphdb:ruleset "rdfsplus-optimized"
        ]
    ] .
"#;

// ============================================================================
// Wire-level scenarios against an httpmock server
// ============================================================================

mod wire {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn provider_for(server: &MockServer) -> GraphDbProvider {
        let connection = ConnectionConfig::new(server.host())
            .expect("valid host")
            .with_port(server.port())
            .with_username("admin")
            .with_password("root");
        GraphDbProvider::connect(&connection).expect("provider should build")
    }

    /// Create "TestUser" as user, read back, update to repo-manager, read back.
    #[tokio::test]
    async fn test_user_create_update_lifecycle() {
        let server = MockServer::start_async().await;
        let provider = provider_for(&server);
        let users = provider.users();

        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/security/users/TestUser")
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "username": "TestUser",
                        "password": "SuperSecret",
                        "grantedAuthorities": ["ROLE_USER"],
                    }));
                then.status(201);
            })
            .await;
        let mut get = server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/security/users/TestUser");
                then.status(200).json_body(json!({
                    "username": "TestUser",
                    "password": "",
                    "grantedAuthorities": ["ROLE_USER"],
                }));
            })
            .await;

        let created = users
            .create(&UserConfig::new("TestUser", Role::User).with_password("SuperSecret"))
            .await
            .expect("create should succeed");
        create.assert_async().await;
        assert_eq!(created.username, "TestUser");
        assert_eq!(created.role, Role::User);

        let update = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/rest/security/users/TestUser")
                    .json_body(json!({
                        "username": "TestUser",
                        "password": "SuperSecret",
                        "grantedAuthorities": ["ROLE_REPO_MANAGER"],
                    }));
                then.status(200);
            })
            .await;
        get.delete_async().await;
        get = server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/security/users/TestUser");
                then.status(200).json_body(json!({
                    "username": "TestUser",
                    "password": "",
                    "grantedAuthorities": ["ROLE_REPO_MANAGER"],
                }));
            })
            .await;

        let updated = users
            .update(
                "TestUser",
                &UserConfig::new("TestUser", Role::RepoManager).with_password("SuperSecret"),
            )
            .await
            .expect("update should succeed");
        update.assert_async().await;
        get.assert_async().await;
        assert_eq!(updated.username, "TestUser");
        assert_eq!(updated.role, Role::RepoManager);
    }

    #[tokio::test]
    async fn test_import_user_by_username() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/security/users/DSUser1");
                then.status(200).json_body(json!({
                    "username": "DSUser1",
                    "password": "",
                    "grantedAuthorities": ["ROLE_USER"],
                }));
            })
            .await;

        let state = provider_for(&server)
            .users()
            .import("DSUser1")
            .await
            .expect("import should succeed");
        assert_eq!(state.id, "DSUser1");
        assert_eq!(state.username, "DSUser1");
    }

    #[tokio::test]
    async fn test_read_deleted_user_returns_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/security/users/Gone");
                then.status(404);
            })
            .await;

        let state = provider_for(&server)
            .users()
            .read("Gone")
            .await
            .expect("404 is not an error on read");
        assert!(state.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_statuses() {
        let server = MockServer::start_async().await;
        let ok = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/rest/security/users/TestUser")
                    .header("authorization", "Basic YWRtaW46cm9vdA==");
                then.status(204);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/security/users/admin");
                then.status(200).body("{\"message\": \"admin cannot be deleted\"}");
            })
            .await;

        let users = provider_for(&server).users();
        users.delete("TestUser").await.expect("204 is success");
        ok.assert_async().await;

        let err = users.delete("admin").await.expect_err("only 204 is success");
        assert!(matches!(
            err.root(),
            Error::UnexpectedStatus { status: 200, body } if body == "{\"message\": \"admin cannot be deleted\"}"
        ));
    }

    /// A `#` in the username must not cut the path short and hit another user.
    #[tokio::test]
    async fn test_delete_user_with_fragment_character() {
        let server = MockServer::start_async().await;
        let alice = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/security/users/alice");
                then.status(204);
            })
            .await;
        let alice_ops = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/security/users/alice%23ops");
                then.status(204);
            })
            .await;

        provider_for(&server)
            .users()
            .delete("alice#ops")
            .await
            .expect("204 is success");

        alice_ops.assert_async().await;
        alice.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_repository_create_read_delete() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/repositories")
                    .header_includes("content-type", "multipart/form-data")
                    .body_includes("name=\"config\"")
                    .body_includes("rep:repositoryID \"TestRepo\"");
                then.status(201);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/repositories/TestRepo");
                then.status(200).json_body(json!({
                    "id": "TestRepo",
                    "title": "Test repository",
                    "type": "graphdb",
                    "location": "",
                }));
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/repositories/TestRepo");
                then.status(200);
            })
            .await;

        let repos = provider_for(&server).repositories();
        let state = repos
            .create(&RepositoryConfig {
                name: "TestRepo".to_string(),
                config: TEST_REPO_CONFIG.to_string(),
            })
            .await
            .expect("create should succeed");
        create.assert_async().await;
        assert_eq!(state.name, "TestRepo");
        assert_eq!(state.description, "Test repository");

        let read = repos
            .read("TestRepo")
            .await
            .expect("read should succeed")
            .expect("repository exists");
        assert_eq!(read, state);

        repos.delete("TestRepo").await.expect("delete should succeed");
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_repository_config_sends_nothing() {
        let server = MockServer::start_async().await;
        let any = server
            .mock_async(|when, then| {
                when.path_includes("/rest/");
                then.status(201);
            })
            .await;

        let err = provider_for(&server)
            .repositories()
            .create(&RepositoryConfig {
                name: "TestRepo".to_string(),
                config: String::new(),
            })
            .await
            .expect_err("empty config is invalid");

        assert!(matches!(err.root(), Error::Validation(_)));
        any.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_empty_listings() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/repositories");
                then.status(200).json_body(json!([]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/security/users/");
                then.status(200).json_body(json!([]));
            })
            .await;

        let provider = provider_for(&server);
        let repos = provider
            .repositories_data_source()
            .read_all()
            .await
            .expect("empty is not an error");
        let users = provider
            .users_data_source()
            .read_all()
            .await
            .expect("empty is not an error");

        assert!(repos.items.is_empty());
        assert!(users.items.is_empty());
    }

    #[tokio::test]
    async fn test_users_listing_skips_malformed_entries() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/security/users/");
                then.status(200).json_body(json!([
                    {"username": "admin", "grantedAuthorities": ["ROLE_ADMIN"]},
                    {"username": "DSUser1", "grantedAuthorities": ["ROLE_USER"]},
                    {"username": "odd", "grantedAuthorities": ["ROLEZ"]},
                    {"username": "DSManager1", "grantedAuthorities": ["ROLE_REPO_MANAGER"]},
                ]));
            })
            .await;

        let listing = provider_for(&server)
            .users_data_source()
            .read_all()
            .await
            .expect("listing should succeed");

        assert_eq!(listing.items.len(), 3);
        assert_eq!(listing.diagnostics.len(), 1);
        assert!(listing.diagnostics[0].detail.contains("odd"));
    }
}

// ============================================================================
// Scenarios over the in-memory server
// ============================================================================

mod in_memory {
    use super::*;

    #[tokio::test]
    async fn test_users_listing_counts_seeded_admin() {
        let mock = Arc::new(MockGraphDb::new());
        mock.seed_user(UserSummary {
            username: "admin".to_string(),
            password: String::new(),
            granted_authorities: vec!["ROLE_ADMIN".to_string()],
        });
        let provider = GraphDbProvider::with_client(mock);
        let users = provider.users();

        users
            .create(&UserConfig::new("DSUser1", Role::User))
            .await
            .expect("create should succeed");
        users
            .create(&UserConfig::new("DSManager1", Role::RepoManager).with_password("Hello1"))
            .await
            .expect("create should succeed");
        users
            .create(&UserConfig::new("DSadmin1", Role::Admin))
            .await
            .expect("create should succeed");

        let listing = provider
            .users_data_source()
            .read_all()
            .await
            .expect("listing should succeed");
        assert_eq!(listing.items.len(), 4);
        assert!(listing.is_complete());
    }

    #[tokio::test]
    async fn test_repository_listing_after_create() {
        let provider = GraphDbProvider::with_client(Arc::new(MockGraphDb::new()));

        provider
            .repositories()
            .create(&RepositoryConfig {
                name: "TestRepo".to_string(),
                config: TEST_REPO_CONFIG.to_string(),
            })
            .await
            .expect("create should succeed");

        let listing = provider
            .repositories_data_source()
            .read_all()
            .await
            .expect("listing should succeed");
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].id, "TestRepo");
        assert_eq!(listing.items[0].description, "Test repository");
        assert!(listing.items[0].local);
    }

    #[tokio::test]
    async fn test_duplicate_user_create_surfaces_server_message() {
        let provider = GraphDbProvider::with_client(Arc::new(MockGraphDb::new()));
        let users = provider.users();
        users
            .create(&UserConfig::new("TestUser", Role::User))
            .await
            .expect("create should succeed");

        let err = users
            .create(&UserConfig::new("TestUser", Role::User))
            .await
            .expect_err("duplicate");
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("User TestUser already exists."));
    }
}

// ============================================================================
// Live scenarios against a running GraphDB
// ============================================================================

mod live {
    use super::*;

    fn unique_name(prefix: &str) -> String {
        format!("{}{}", prefix, &uuid::Uuid::new_v4().simple().to_string()[..8])
    }

    fn live_provider() -> GraphDbProvider {
        GraphDbProvider::configure(&graphdb_provider::ProviderConfig::default())
            .expect("GRAPHDB_HOST must be set for live tests")
    }

    #[tokio::test]
    #[ignore = "Integration test requires GRAPHDB_INTEGRATION_TESTS=1 and a running GraphDB"]
    async fn test_user_lifecycle() {
        if !should_run_integration_tests() {
            return;
        }

        let users = live_provider().users();
        let username = unique_name("TestUser");

        let created = users
            .create(&UserConfig::new(&username, Role::User).with_password("SuperSecret"))
            .await
            .expect("create should succeed");
        assert_eq!(created.role, Role::User);

        let updated = users
            .update(
                &username,
                &UserConfig::new(&username, Role::RepoManager).with_password("SuperSecret"),
            )
            .await
            .expect("update should succeed");
        assert_eq!(updated.role, Role::RepoManager);

        let imported = users.import(&username).await.expect("import should succeed");
        assert_eq!(imported.id, username);

        users.delete(&username).await.expect("delete should succeed");
        assert!(users
            .read(&username)
            .await
            .expect("read should succeed")
            .is_none());
    }

    #[tokio::test]
    #[ignore = "Integration test requires GRAPHDB_INTEGRATION_TESTS=1 and a running GraphDB"]
    async fn test_repository_lifecycle() {
        if !should_run_integration_tests() {
            return;
        }

        let repos = live_provider().repositories();
        let name = unique_name("TestRepo");
        let config = TEST_REPO_CONFIG.replace("\"TestRepo\"", &format!("\"{name}\""));

        let state = repos
            .create(&RepositoryConfig {
                name: name.clone(),
                config,
            })
            .await
            .expect("create should succeed");
        assert_eq!(state.id, name);

        repos.delete(&name).await.expect("delete should succeed");
    }
}
