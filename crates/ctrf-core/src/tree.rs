//! Runner result tree as handed over at the end of a session.
//!
//! Nodes are tagged by `type`. Status tokens stay raw strings so that an
//! unexpected runner vocabulary never fails decoding; classification happens
//! later in [`crate::status::map_status`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::errors::{CtrfError, Result};

/// Deepest JSON nesting accepted for one root node. A suite level takes two
/// (the node object and its `tasks` array), so this admits about 127 suites.
pub const MAX_ROOT_DEPTH: usize = 256;

/// One node of the runner tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskNode {
    /// A test file. Counted as a suite, but its name is not part of test names.
    File(FileTask),
    Suite(SuiteTask),
    Test(TestTask),
    /// Any node kind this reporter does not understand (e.g. `custom`, `benchmark`).
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileTask {
    /// Path relative to the project root, as reported by the runner.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<TaskNode>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuiteTask {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<TaskNode>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestTask {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Scheduling mode (`run`, `skip`, `only`, `todo`); used when no result exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<TaskResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,
    /// Overrides the file inherited from the enclosing file node. Accepts a
    /// path string or a file task reference (`{"name": ...}`).
    #[serde(
        default,
        deserialize_with = "file_reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Milliseconds; fractional values are common.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<TaskError>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        rename = "stackStr",
        alias = "stack",
        alias = "stackTrace",
        skip_serializing_if = "Option::is_none"
    )]
    pub stack_str: Option<String>,
}

fn null_as_default<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileReference {
    Path(String),
    Task { name: String },
    Other(serde::de::IgnoredAny),
}

fn file_reference<'de, D>(de: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FileReference>::deserialize(de)? {
        Some(FileReference::Path(path)) => Some(path),
        Some(FileReference::Task { name }) => Some(name),
        Some(FileReference::Other(_)) | None => None,
    })
}

impl TestTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.result.get_or_insert_with(TaskResult::default).state = Some(state.into());
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.result.get_or_insert_with(TaskResult::default).duration = Some(duration);
        self
    }

    pub fn with_error(mut self, message: impl Into<String>, stack: impl Into<String>) -> Self {
        self.result
            .get_or_insert_with(TaskResult::default)
            .errors
            .get_or_insert_with(Vec::new)
            .push(TaskError {
                message: Some(message.into()),
                stack_str: Some(stack.into()),
            });
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Token used for classification: a non-empty result state, else the mode.
    pub fn effective_state(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|r| r.state.as_deref())
            .filter(|s| !s.is_empty())
            .or(self.mode.as_deref())
    }

    /// Token reported as `rawStatus`: the result state when set (even if
    /// empty), else the mode.
    pub fn raw_state(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|r| r.state.as_deref())
            .or(self.mode.as_deref())
    }
}

impl SuiteTask {
    pub fn new(name: impl Into<String>, tasks: Vec<TaskNode>) -> Self {
        Self {
            name: name.into(),
            tasks,
        }
    }
}

impl FileTask {
    pub fn new(name: impl Into<String>, tasks: Vec<TaskNode>) -> Self {
        Self {
            name: name.into(),
            filepath: None,
            tasks,
        }
    }
}

impl From<TestTask> for TaskNode {
    fn from(t: TestTask) -> Self {
        TaskNode::Test(t)
    }
}

impl From<SuiteTask> for TaskNode {
    fn from(s: SuiteTask) -> Self {
        TaskNode::Suite(s)
    }
}

impl From<FileTask> for TaskNode {
    fn from(f: FileTask) -> Self {
        TaskNode::File(f)
    }
}

/// What the host runner hands over at session end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunnerOutput {
    /// Root values, not yet decoded. Each is decoded on its own.
    pub files: Vec<Value>,
    /// Unhandled runner errors; logged, never part of the report.
    pub errors: Vec<Value>,
}

#[derive(Deserialize)]
struct SessionDocument<'a> {
    #[serde(default, borrow)]
    files: Vec<&'a RawValue>,
    #[serde(default, borrow)]
    errors: Vec<&'a RawValue>,
}

impl RunnerOutput {
    /// Parse a serialized runner session: a bare array of root nodes, or
    /// `{"files": [...], "errors": [...]}`.
    ///
    /// Only the envelope is parsed here; each root is split off as raw text
    /// and parsed on its own, so a root that nests too deeply or is not valid
    /// is logged and skipped while its siblings are kept.
    pub fn from_json(text: &str) -> Result<Self> {
        let (roots, errors) = match text.trim_start().as_bytes().first() {
            Some(b'[') => (parse_envelope::<Vec<&RawValue>>(text)?, Vec::new()),
            Some(b'{') => {
                let doc: SessionDocument<'_> = parse_envelope(text)?;
                (doc.files, doc.errors)
            }
            _ => {
                return Err(CtrfError::decode(
                    "expected a node array or a session object",
                ))
            }
        };

        let total = roots.len();
        let mut files = Vec::with_capacity(total);
        for (index, raw) in roots.into_iter().enumerate() {
            match parse_root(raw) {
                Ok(value) => files.push(value),
                Err(e) => {
                    tracing::error!(index, total, error = %e, "skipping malformed root node");
                }
            }
        }

        let errors = errors
            .into_iter()
            .map(|raw| {
                serde_json::from_str(raw.get()).unwrap_or_else(|_| Value::String(raw.get().into()))
            })
            .collect();

        Ok(Self { files, errors })
    }
}

fn parse_envelope<'de, T: Deserialize<'de>>(text: &'de str) -> Result<T> {
    let shape_error =
        |e: serde_json::Error| CtrfError::decode(format!("expected a node array or a session object: {e}"));
    let mut de = serde_json::Deserializer::from_str(text);
    // Roots are captured as raw text; their depth is checked per root.
    de.disable_recursion_limit();
    let parsed = T::deserialize(&mut de).map_err(shape_error)?;
    de.end().map_err(shape_error)?;
    Ok(parsed)
}

fn parse_root(raw: &RawValue) -> Result<Value> {
    let depth = text_depth(raw.get());
    if depth > MAX_ROOT_DEPTH {
        return Err(too_deep(depth));
    }
    let mut de = serde_json::Deserializer::from_str(raw.get());
    de.disable_recursion_limit();
    Value::deserialize(&mut de).map_err(|e| CtrfError::decode(e.to_string()))
}

/// Decode a single root node. Roots nesting deeper than [`MAX_ROOT_DEPTH`]
/// are rejected.
pub fn decode_node(value: Value) -> Result<TaskNode> {
    let depth = value_depth(&value);
    if depth > MAX_ROOT_DEPTH {
        return Err(too_deep(depth));
    }
    serde_json::from_value(value).map_err(|e| CtrfError::decode(e.to_string()))
}

fn too_deep(depth: usize) -> CtrfError {
    CtrfError::decode(format!(
        "root nests {depth} levels deep, limit is {MAX_ROOT_DEPTH}"
    ))
}

/// Maximum bracket nesting of a JSON text, ignoring brackets inside strings.
fn text_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

fn value_depth(value: &Value) -> usize {
    let mut max = 0;
    let mut stack = vec![(value, 0usize)];
    while let Some((value, depth)) = stack.pop() {
        match value {
            Value::Array(items) => {
                max = max.max(depth + 1);
                stack.extend(items.iter().map(|v| (v, depth + 1)));
            }
            Value::Object(map) => {
                max = max.max(depth + 1);
                stack.extend(map.values().map(|v| (v, depth + 1)));
            }
            _ => {}
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_nested_suite_and_test() {
        let node = decode_node(json!({
            "type": "suite",
            "name": "math",
            "tasks": [
                {
                    "type": "test",
                    "name": "adds",
                    "mode": "run",
                    "result": { "state": "pass", "duration": 5.2 },
                    "retry": 1
                }
            ]
        }))
        .unwrap();

        let TaskNode::Suite(suite) = node else {
            panic!("expected suite");
        };
        assert_eq!(suite.name, "math");
        let TaskNode::Test(test) = &suite.tasks[0] else {
            panic!("expected test");
        };
        assert_eq!(test.effective_state(), Some("pass"));
        assert_eq!(test.retry, Some(1));
        assert_eq!(test.result.as_ref().unwrap().duration, Some(5.2));
    }

    #[test]
    fn unknown_type_decodes_to_unknown() {
        let node = decode_node(json!({ "type": "benchmark", "name": "b" })).unwrap();
        assert_eq!(node, TaskNode::Unknown);
    }

    #[test]
    fn error_stack_accepts_all_spellings() {
        let a: TaskError = serde_json::from_value(json!({"message": "m", "stackStr": "s1"})).unwrap();
        let b: TaskError = serde_json::from_value(json!({"message": "m", "stack": "s2"})).unwrap();
        let c: TaskError =
            serde_json::from_value(json!({"message": "m", "stackTrace": "s3"})).unwrap();
        assert_eq!(a.stack_str.as_deref(), Some("s1"));
        assert_eq!(b.stack_str.as_deref(), Some("s2"));
        assert_eq!(c.stack_str.as_deref(), Some("s3"));
    }

    #[test]
    fn effective_state_falls_back_to_mode() {
        let t = TestTask::new("t").with_mode("todo");
        assert_eq!(t.effective_state(), Some("todo"));

        let t = TestTask::new("t").with_mode("run").with_state("fail");
        assert_eq!(t.effective_state(), Some("fail"));

        assert_eq!(TestTask::new("t").effective_state(), None);
    }

    #[test]
    fn malformed_node_is_a_decode_error() {
        let err = decode_node(json!({ "type": "test", "name": 42 })).unwrap_err();
        assert!(matches!(err, CtrfError::Decode { .. }));
    }

    #[test]
    fn runner_output_accepts_array_and_session() {
        let out = RunnerOutput::from_json(r#"[{"type":"test","name":"t"}]"#).unwrap();
        assert_eq!(out.files.len(), 1);
        assert!(out.errors.is_empty());

        let out = RunnerOutput::from_json(
            r#"{"files":[{"type":"file","name":"a.test.ts","tasks":[]}],"errors":["boom"]}"#,
        )
        .unwrap();
        assert_eq!(out.files.len(), 1);
        assert_eq!(out.errors.len(), 1);

        assert!(RunnerOutput::from_json("42").is_err());
        assert!(RunnerOutput::from_json("[1, 2").is_err());
    }

    fn nested_suites(levels: usize) -> String {
        let mut text = r#"{"type":"test","name":"leaf","result":{"state":"pass"}}"#.to_string();
        for i in 0..levels {
            text = format!(r#"{{"type":"suite","name":"s{i}","tasks":[{text}]}}"#);
        }
        text
    }

    #[test]
    fn deep_root_does_not_take_siblings_down() {
        let shallow = r#"{"type":"test","name":"ok","result":{"state":"pass"}}"#;
        let text = format!("[{shallow},{}]", nested_suites(70));

        let out = RunnerOutput::from_json(&text).unwrap();
        assert_eq!(out.files.len(), 2);
        let TaskNode::Suite(outer) = decode_node(out.files[1].clone()).unwrap() else {
            panic!("expected suite");
        };
        assert_eq!(outer.name, "s69");
    }

    #[test]
    fn root_past_the_depth_limit_is_skipped_alone() {
        let shallow = r#"{"type":"test","name":"ok","result":{"state":"pass"}}"#;
        let text = format!(
            r#"{{"files":[{},{shallow}],"errors":[]}}"#,
            nested_suites(MAX_ROOT_DEPTH)
        );

        let out = RunnerOutput::from_json(&text).unwrap();
        assert_eq!(out.files.len(), 1);
        assert_eq!(out.files[0]["name"], "ok");
    }

    #[test]
    fn decode_node_rejects_values_past_the_depth_limit() {
        let mut value = json!({"type": "test", "name": "leaf"});
        for _ in 0..MAX_ROOT_DEPTH {
            value = json!({"type": "suite", "name": "s", "tasks": [value]});
        }
        let err = decode_node(value).unwrap_err();
        assert!(err.to_string().contains("levels deep"), "got {err}");
    }

    #[test]
    fn brackets_inside_strings_do_not_count_as_depth() {
        assert_eq!(text_depth(r#"{"name":"[[[{{{\"]]"}"#), 1);
        assert_eq!(text_depth(r#"[[],{"a":[1]}]"#), 3);
        assert_eq!(text_depth("42"), 0);
    }

    #[test]
    fn null_names_decode_as_empty() {
        let node = decode_node(json!({"type": "test", "name": null})).unwrap();
        assert_eq!(node, TaskNode::Test(TestTask::new("")));

        let node = decode_node(json!({
            "type": "file",
            "name": null,
            "tasks": [{"type": "suite", "name": null, "tasks": [
                {"type": "test", "name": null, "result": {"state": "pass"}}
            ]}]
        }))
        .unwrap();
        let TaskNode::File(file) = node else {
            panic!("expected file");
        };
        assert_eq!(file.name, "");
        let TaskNode::Suite(suite) = &file.tasks[0] else {
            panic!("expected suite");
        };
        assert_eq!(suite.name, "");
        assert_eq!(suite.tasks.len(), 1);
    }

    #[test]
    fn null_task_list_decodes_as_empty() {
        let node = decode_node(json!({"type": "suite", "name": "s", "tasks": null})).unwrap();
        assert_eq!(node, TaskNode::Suite(SuiteTask::new("s", vec![])));
    }

    #[test]
    fn file_reference_accepts_path_or_task_object() {
        let by_object = decode_node(json!({
            "type": "test", "name": "t", "file": {"name": "a.test.ts", "type": "file"}
        }))
        .unwrap();
        let by_path = decode_node(json!({"type": "test", "name": "t", "file": "b.test.ts"})).unwrap();
        let unusable = decode_node(json!({"type": "test", "name": "t", "file": 7})).unwrap();

        let file = |node: &TaskNode| match node {
            TaskNode::Test(t) => t.file.clone(),
            other => panic!("expected test, got {other:?}"),
        };
        assert_eq!(file(&by_object).as_deref(), Some("a.test.ts"));
        assert_eq!(file(&by_path).as_deref(), Some("b.test.ts"));
        assert_eq!(file(&unusable), None);
    }

    #[test]
    fn raw_state_keeps_empty_state() {
        let t = TestTask::new("t").with_mode("run").with_state("");
        assert_eq!(t.raw_state(), Some(""));
        assert_eq!(t.effective_state(), Some("run"));

        let t = TestTask::new("t").with_mode("skip");
        assert_eq!(t.raw_state(), Some("skip"));
    }
}
