//! Shared fixtures for Redmine HTTP tests.

#![allow(dead_code)]

use redmine::{RedmineClient, RedmineConfig};
use serde_json::{Value, json};

pub const API_KEY: &str = "test-api-key";

/// Client pointed at a mock server.
pub fn client_for(base_url: &str) -> RedmineClient {
    let config = RedmineConfig::new(base_url, API_KEY).expect("valid config");
    RedmineClient::new(&config).expect("client should build")
}

/// `count` journals with ids and notes numbered from 1.
pub fn journals(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "id": i,
                "user": {"id": 1, "name": "John Doe"},
                "notes": format!("Journal entry {i}"),
                "created_on": "2024-01-15T10:30:00Z",
                "details": []
            })
        })
        .collect()
}

/// Issue payload wrapped in the `issue` envelope.
pub fn issue_response(id: u64, journals: Vec<Value>) -> Value {
    json!({
        "issue": {
            "id": id,
            "project": {"id": 1, "name": "Test Project"},
            "tracker": {"id": 1, "name": "Bug"},
            "status": {"id": 1, "name": "New"},
            "priority": {"id": 2, "name": "Normal"},
            "author": {"id": 1, "name": "John Doe"},
            "assigned_to": {"id": 2, "name": "Jane Smith"},
            "subject": "Test issue subject",
            "description": "This is a test issue description",
            "start_date": "2024-01-15",
            "due_date": "2024-01-30",
            "done_ratio": 50,
            "estimated_hours": 8,
            "created_on": "2024-01-15T10:00:00Z",
            "updated_on": "2024-01-20T14:30:00Z",
            "journals": journals
        }
    })
}

pub fn activities_response(activities: &[(u64, &str, bool)]) -> Value {
    let rows: Vec<Value> = activities
        .iter()
        .map(|(id, name, is_default)| json!({"id": id, "name": name, "is_default": is_default}))
        .collect();
    json!({ "time_entry_activities": rows })
}

pub fn time_entry_response(issue_id: u64, activity_id: u64, hours: f64) -> Value {
    json!({
        "time_entry": {
            "id": 100,
            "project": {"id": 1, "name": "Test Project"},
            "issue": {"id": issue_id},
            "user": {"id": 1, "name": "John Doe"},
            "activity": {"id": activity_id, "name": "Development"},
            "hours": hours,
            "comments": "Worked on bug fix",
            "spent_on": "2024-01-20",
            "created_on": "2024-01-20T15:00:00Z",
            "updated_on": "2024-01-20T15:00:00Z"
        }
    })
}
