pub mod mock_judge_server;
