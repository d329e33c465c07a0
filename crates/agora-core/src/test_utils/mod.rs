pub mod mock_backend_server;
