//! End-to-end pipeline runs against scripted providers

use agent_llm::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason, TokenUsage,
};
use agent_stock::prompts::ANALYSIS_SENTINEL;
use agent_stock::{
    AnalysisClient, AnalysisKind, DailyBar, HistoryStore, InfoRecord, MarketDataProvider,
    StockError,
};
use agent_utils::MapSource;
use agent_workflow::{
    AnalysisRequest, PipelineState, Workflow, WorkflowError, analyze_stocks_simple,
};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tempfile::{TempDir, tempdir};

const MODEL: &str = "gpt-4o-mini";

/// Answers forward prompts with `analysis:<n>` and history prompts with `summary:<n>`
#[derive(Default)]
struct ScriptedLLM {
    prompts: Mutex<Vec<(AnalysisKind, String)>>,
    fail: bool,
}

impl ScriptedLLM {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn prompts(&self, kind: AnalysisKind) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl LLMProvider for ScriptedLLM {
    async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
        let kind = if request.system.as_deref() == Some(AnalysisKind::History.system_instruction()) {
            AnalysisKind::History
        } else {
            AnalysisKind::Forward
        };

        let mut prompts = self.prompts.lock().unwrap();
        prompts.push((kind, request.messages[0].text().to_string()));
        let n = prompts.iter().filter(|(k, _)| *k == kind).count();

        if self.fail {
            return Err(LLMError::RequestFailed("connection reset".to_string()));
        }

        let text = match kind {
            AnalysisKind::Forward => format!("analysis:{n}"),
            AnalysisKind::History => format!("summary:{n}"),
        };
        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Serves `<SYMBOL> headlines` as news; symbols starting with `BAD` fail,
/// weekends have no bars
#[derive(Default)]
struct FakeMarket {
    calls: Mutex<Vec<String>>,
}

impl FakeMarket {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataProvider for FakeMarket {
    async fn current_info(&self, symbol: &str) -> agent_stock::Result<InfoRecord> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if symbol.starts_with("BAD") {
            return Err(StockError::YahooFinanceError(format!("unknown symbol {symbol}")));
        }

        let mut record = InfoRecord::new();
        record.insert("symbol".into(), symbol.into());
        record.insert("currentPrice".into(), json!(100.0));
        record.insert("news_summary".into(), format!("{symbol} headlines").into());
        Ok(record)
    }

    async fn daily_bar(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> agent_stock::Result<Option<DailyBar>> {
        self.calls.lock().unwrap().push(symbol.to_string());
        let trading = !matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        Ok(trading.then_some(DailyBar {
            date,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1,
        }))
    }
}

struct Harness {
    workflow: Workflow,
    llm: Arc<ScriptedLLM>,
    market: Arc<FakeMarket>,
    history_path: std::path::PathBuf,
    _dir: TempDir,
}

fn harness_with(llm: ScriptedLLM) -> Harness {
    let dir = tempdir().unwrap();
    let history_path = dir.path().join("data").join("stock_history.json");
    let llm = Arc::new(llm);
    let market = Arc::new(FakeMarket::default());

    let workflow = Workflow::builder()
        .client(AnalysisClient::new(llm.clone(), MODEL))
        .market_provider(market.clone())
        .history_store(HistoryStore::new(&history_path))
        .build()
        .unwrap();

    Harness {
        workflow,
        llm,
        market,
        history_path,
        _dir: dir,
    }
}

fn harness() -> Harness {
    harness_with(ScriptedLLM::default())
}

fn record(value: serde_json::Value) -> InfoRecord {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn assert_aligned(state: &PipelineState) {
    let n = state.stock_list.len();
    assert_eq!(state.today_info.as_ref().unwrap().len(), n);
    assert_eq!(state.history_info.as_ref().unwrap().len(), n);
    assert_eq!(state.analysis_prompts.as_ref().unwrap().len(), n);
    assert_eq!(state.history_prompts.as_ref().unwrap().len(), n);
    assert_eq!(state.analysis_results.as_ref().unwrap().len(), n);
    assert_eq!(state.history_results.as_ref().unwrap().len(), n);
}

#[tokio::test]
async fn supplied_info_skips_fetch_and_all_symbols_persist() {
    let h = harness();
    let request = AnalysisRequest::new(MODEL, ["AAPL", "MSFT"], ["network_effect"; 2])
        .with_today_info(vec![Some(record(json!({ "news_summary": "X" }))), None]);

    let state = h.workflow.analyze(request).await.unwrap();

    assert_eq!(h.market.calls(), vec!["MSFT"]);
    assert_aligned(&state);

    let prompts = state.analysis_prompts.as_ref().unwrap();
    assert!(prompts[0].contains("【新闻摘要】\nX\n"));
    assert!(prompts[1].contains("MSFT headlines"));

    assert_eq!(
        state.analysis_results.unwrap(),
        vec!["analysis:1", "analysis:2"]
    );

    let stored = HistoryStore::new(&h.history_path).load(&["AAPL".into(), "MSFT".into()]);
    assert_eq!(
        stored,
        vec![Some("summary:1".to_string()), Some("summary:2".to_string())]
    );
}

#[tokio::test]
async fn history_from_previous_run_feeds_next_prompts() {
    let h = harness();

    let first = AnalysisRequest::new(MODEL, ["AAPL"], ["network_effect"]);
    let state = h.workflow.analyze(first.clone()).await.unwrap();
    assert_eq!(state.history_info, Some(vec![None]));

    let state = h.workflow.analyze(first).await.unwrap();
    assert_eq!(state.history_info, Some(vec![Some("summary:1".to_string())]));
    assert!(state.analysis_prompts.unwrap()[0].contains("summary:1"));
    assert!(state.history_prompts.unwrap()[0].contains("summary:1"));

    let stored = h.workflow.history().load(&["AAPL".into()]);
    assert_eq!(stored, vec![Some("summary:2".to_string())]);
}

#[tokio::test]
async fn fetch_failure_only_affects_its_symbol() {
    let h = harness();
    let request = AnalysisRequest::new(MODEL, ["BADSYM", "MSFT"], ["network_effect"; 2]);

    let state = h.workflow.analyze(request).await.unwrap();
    assert_aligned(&state);

    let today_info = state.today_info.as_ref().unwrap();
    assert!(
        today_info[0]["error"]
            .as_str()
            .unwrap()
            .contains("unknown symbol BADSYM")
    );

    let prompts = state.analysis_prompts.as_ref().unwrap();
    assert_eq!(prompts[0], ANALYSIS_SENTINEL);
    assert!(prompts[1].contains("MSFT headlines"));
}

#[tokio::test]
async fn prompt_params_override_fetched_fields() {
    let h = harness();
    let request = AnalysisRequest::new(MODEL, ["AAPL", "MSFT"], ["network_effect"; 2])
        .with_prompt_params(vec![
            Some(record(json!({ "news_summary": "override news" }))),
            None,
        ]);

    let state = h.workflow.analyze(request).await.unwrap();
    let prompts = state.analysis_prompts.unwrap();

    assert!(prompts[0].contains("override news"));
    assert!(!prompts[0].contains("AAPL headlines"));
    assert!(prompts[1].contains("MSFT headlines"));

    let history_prompts = state.history_prompts.unwrap();
    assert!(history_prompts[0].contains("AAPL headlines"));
}

#[tokio::test]
async fn dated_run_requests_bars() {
    let h = harness();
    let saturday = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let request = AnalysisRequest::new(MODEL, ["AAPL"], ["network_effect"])
        .with_date(saturday)
        .with_prompt_params(vec![Some(record(json!({ "news_summary": "weekend" })))]);

    let state = h.workflow.analyze(request).await.unwrap();

    let info = &state.today_info.as_ref().unwrap()[0];
    assert_eq!(info["date"], "2024-06-01");
    assert_eq!(info["error"], "no trading data for 2024-06-01");
    assert!(state.analysis_prompts.unwrap()[0].contains("weekend"));
}

#[tokio::test]
async fn llm_failures_fill_every_slot() {
    let h = harness_with(ScriptedLLM::failing());
    let request = AnalysisRequest::new(MODEL, ["AAPL", "MSFT"], ["network_effect"; 2]);

    let state = h.workflow.analyze(request).await.unwrap();
    assert_aligned(&state);

    for text in state.analysis_results.unwrap() {
        assert!(text.starts_with("analysis failed:"));
        assert!(text.contains("connection reset"));
    }
    assert_eq!(h.llm.prompts(AnalysisKind::Forward).len(), 2);
    assert_eq!(h.llm.prompts(AnalysisKind::History).len(), 2);
}

#[tokio::test]
async fn prefilled_prompts_are_not_recompiled() {
    let h = harness();
    let mut state = PipelineState::from(AnalysisRequest::new(
        MODEL,
        ["AAPL"],
        ["network_effect"],
    ));
    state.analysis_prompts = Some(vec!["hand-written prompt".to_string()]);

    let state = h.workflow.run(state).await.unwrap();

    assert_eq!(
        state.analysis_prompts,
        Some(vec!["hand-written prompt".to_string()])
    );
    assert_eq!(
        h.llm.prompts(AnalysisKind::Forward),
        vec!["hand-written prompt"]
    );
}

#[tokio::test]
async fn invalid_requests_fail_before_prepare() {
    let h = harness();

    let mismatch = AnalysisRequest::new(MODEL, ["AAPL", "MSFT"], ["network_effect"]);
    assert!(matches!(
        h.workflow.analyze(mismatch).await,
        Err(WorkflowError::LengthMismatch { .. })
    ));

    let unknown = AnalysisRequest::new(MODEL, ["AAPL"], ["technical"]);
    assert!(matches!(
        h.workflow.analyze(unknown).await,
        Err(WorkflowError::UnknownStyle(_))
    ));

    let empty = AnalysisRequest::new(MODEL, Vec::<String>::new(), Vec::<String>::new());
    assert!(matches!(
        h.workflow.analyze(empty).await,
        Err(WorkflowError::EmptySymbols)
    ));

    assert!(h.market.calls().is_empty());
    assert!(h.llm.prompts(AnalysisKind::Forward).is_empty());
    assert!(!h.history_path.exists());
}

#[tokio::test]
async fn entry_point_rejects_bad_configuration() {
    let request = AnalysisRequest::new("llama-3-70b", ["AAPL"], ["network_effect"]);
    let err = analyze_stocks_simple(request, &MapSource::new()).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Stock(StockError::Llm(LLMError::UnsupportedModel(_)))
    ));

    let request = AnalysisRequest::new(MODEL, ["AAPL"], ["network_effect"]);
    let source = MapSource::new().with("OPENAI_API_KEY", "");
    let err = analyze_stocks_simple(request, &source).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Stock(StockError::Llm(LLMError::MissingCredential { .. }))
    ));
}
