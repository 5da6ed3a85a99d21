use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::tools::{empty_schema, Tool};

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    /// `yyyy-MM-dd`, the format every date filter expects.
    fn today_string(&self) -> String {
        self.today().format("%Y-%m-%d").to_string()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub struct CurrentDateTool {
    clock: Arc<dyn Clock>,
}

impl CurrentDateTool {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl Tool for CurrentDateTool {
    fn name(&self) -> &'static str {
        "get_current_date"
    }

    fn description(&self) -> &'static str {
        "Get the current date in the format yyyy-MM-dd. Use this tool when you need the current \
date for temporal filters."
    }

    fn parameters(&self) -> Value {
        empty_schema()
    }

    async fn execute(&self, _input: Value) -> Result<Value> {
        Ok(Value::String(self.clock.today_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use super::{CurrentDateTool, FixedClock};
    use crate::tools::Tool;

    #[tokio::test]
    async fn current_date_uses_injected_clock() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).expect("valid date");
        let tool = CurrentDateTool::new(Arc::new(FixedClock(date)));

        assert_eq!(tool.execute(Value::Null).await.expect("date"), json!("2024-02-09"));
    }
}
