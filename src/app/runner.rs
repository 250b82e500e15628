use crate::core::render::{render_outcome, QUERYING_PLACEHOLDER};
use crate::core::session::{QuerySession, SessionEvent};
use crate::core::{CrowdingReading, CrowdingSource, QueryRequest};
use crate::utils::error::{CrowdingError, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;

pub const INTERACTIVE_HELP: &str =
    "Enter: LINE_ID LINE_NUMBER CARRIAGE or LINE_ID,LINE_NUMBER,CARRIAGE (',,4' leaves fields empty; 'quit' to exit)";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub submitted: usize,
    pub readings: usize,
    pub failures: usize,
    pub discarded: usize,
}

/// 將一行輸入拆成查詢 (空白或逗號分隔)，缺少的欄位以空字串送出；空行回傳 None
pub fn parse_request_line(line: &str) -> Option<QueryRequest> {
    if line.trim().is_empty() {
        return None;
    }

    // 含逗號時以逗號分隔並保留空欄位，才能送出空的前置欄位
    let fields: Vec<&str> = if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    };
    let field = |i: usize| fields.get(i).copied().unwrap_or_default();
    Some(QueryRequest::new(field(0), field(1), field(2)))
}

fn is_quit_command(line: &str) -> bool {
    matches!(line.trim(), "quit" | "exit" | "q")
}

/// 單次查詢：先顯示提示文字，再顯示結果，回傳查詢結果供呼叫端決定結束碼
pub async fn run_once<S, W>(
    session: &QuerySession<S>,
    events: &mut UnboundedReceiver<SessionEvent>,
    request: QueryRequest,
    out: &mut W,
) -> Result<CrowdingReading>
where
    S: CrowdingSource + 'static,
    W: Write,
{
    let ticket = session.submit(request);

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Pending { ticket: t } if t == ticket => {
                writeln!(out, "{}", QUERYING_PLACEHOLDER)?;
                out.flush()?;
            }
            SessionEvent::Completed { ticket: t, outcome } if t == ticket => {
                writeln!(out, "{}", render_outcome(&outcome))?;
                out.flush()?;
                return outcome;
            }
            _ => {}
        }
    }

    Err(CrowdingError::IoError(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "query session closed before the response arrived",
    )))
}

/// 互動模式：每一行輸入等同按一次查詢按鈕
///
/// 輸入結束後會等待仍在進行中的查詢完成 (或被捨棄) 才返回。
pub async fn run_interactive<S, R, W>(
    session: &QuerySession<S>,
    events: &mut UnboundedReceiver<SessionEvent>,
    input: R,
    out: &mut W,
) -> Result<SessionSummary>
where
    S: CrowdingSource + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut summary = SessionSummary::default();
    let mut outstanding = 0usize;
    let mut input_open = true;

    writeln!(out, "{}", INTERACTIVE_HELP)?;
    out.flush()?;

    while input_open || outstanding > 0 {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    None => input_open = false,
                    Some(line) if is_quit_command(&line) => input_open = false,
                    Some(line) => {
                        if let Some(request) = parse_request_line(&line) {
                            session.submit(request);
                            outstanding += 1;
                            summary.submitted += 1;
                        }
                    }
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    SessionEvent::Pending { .. } => {
                        writeln!(out, "{}", QUERYING_PLACEHOLDER)?;
                    }
                    SessionEvent::Completed { outcome, .. } => {
                        outstanding -= 1;
                        match &outcome {
                            Ok(_) => summary.readings += 1,
                            Err(_) => summary.failures += 1,
                        }
                        writeln!(out, "{}", render_outcome(&outcome))?;
                    }
                    SessionEvent::Discarded { ticket } => {
                        outstanding -= 1;
                        summary.discarded += 1;
                        tracing::info!("⏭️ Dropped response to superseded query #{}", ticket);
                    }
                }
                out.flush()?;
            }
        }
    }

    tracing::info!(
        "📊 Session finished: {} submitted, {} readings, {} failures, {} discarded",
        summary.submitted,
        summary.readings,
        summary.failures,
        summary.discarded
    );
    Ok(summary)
}
