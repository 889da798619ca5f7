//! Request and response bodies of the travel-planner API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// What the traveller asks the planner for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    pub destination: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub budget: f64,
    pub travelers_count: u32,
    #[serde(default)]
    pub preferences: String,
}

/// Generated itinerary returned when a plan is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub travel_plan_id: i64,
    pub title: String,
    pub destination: String,
    pub days: u32,
    pub budget: f64,
    pub itinerary: Value,
    pub budget_breakdown: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPlan {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub days: u32,
    pub budget: f64,
    pub travelers_count: u32,
    pub preferences: Option<String>,
    pub itinerary: Option<Value>,
    pub budget_breakdown: Option<Value>,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update; unset fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TravelPlanUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travelers_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewExpense {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_plan_id: Option<i64>,
    pub category: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub travel_plan_id: Option<i64>,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub expense_date: String,
    pub created_at: String,
}

/// Spending totals; the budget fields are only present when filtered by plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total: f64,
    #[serde(default)]
    pub by_category: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Envelope used by the map endpoints: `{"success": bool, "data": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub message: String,
}
