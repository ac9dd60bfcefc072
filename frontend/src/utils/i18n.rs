use std::{fmt, str::FromStr};
use chrono::{DateTime, NaiveDateTime};
use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
  #[default]
  En,
  Zh,
}

impl Locale {
  pub const ALL: [Locale; 2] = [Locale::En, Locale::Zh];

  pub fn code(&self) -> &'static str {
    match self {
      Self::En => "en",
      Self::Zh => "zh-CN",
    }
  }

  /// Name of the locale in its own language.
  pub fn label(&self) -> &'static str {
    match self {
      Self::En => "English",
      Self::Zh => "简体中文",
    }
  }

  pub fn from_code(code: &str) -> Option<Self> {
    match code.trim().to_lowercase().as_str() {
      "en" | "en-us" | "en-gb" => Some(Self::En),
      "zh" | "zh-cn" | "zh-hans" => Some(Self::Zh),
      _ => None,
    }
  }

  fn table(&self) -> &'static [(&'static str, &'static str)] {
    match self {
      Self::En => EN,
      Self::Zh => ZH,
    }
  }

  fn date_format(&self) -> &'static str {
    match self {
      Self::En => "%Y-%m-%d %H:%M",
      Self::Zh => "%Y年%m月%d日 %H:%M",
    }
  }
}

impl fmt::Display for Locale {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.code())
  }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unsupported locale {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
  type Err = UnknownLocale;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_code(s).ok_or_else(|| UnknownLocale(s.to_string()))
  }
}

/// Looks `key` up in the locale's table, then in English, then gives the key back.
pub fn translate(locale: Locale, key: &str) -> &str {
  let lookup = |table: &'static [(&'static str, &'static str)]| table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
  lookup(locale.table()).or_else(|| lookup(EN)).unwrap_or(key)
}

/// Replaces `{name}` placeholders.
pub fn interpolate(template: &str, args: &[(&str, String)]) -> String {
  args.iter().fold(template.to_string(), |acc, (name, value)| acc.replace(&format!("{{{}}}", name), value))
}

/// Backend timestamps are RFC 3339 or naive ISO. Anything else is shown as received.
pub fn format_datetime(locale: Locale, raw: &str) -> String {
  let raw = raw.trim();
  let parsed = DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_local()).ok()
    .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
    .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok());
  match parsed {
    Some(dt) => dt.format(locale.date_format()).to_string(),
    None => raw.to_string(),
  }
}

pub fn dash(value: Option<&str>) -> String {
  match value.map(str::trim) {
    Some(v) if !v.is_empty() => v.to_string(),
    _ => "-".to_string(),
  }
}

/// Locale handle shared through context. Switching the locale re-renders every reader.
#[derive(Clone, Copy, PartialEq)]
pub struct I18n {
  locale: Signal<Locale>,
}

impl I18n {
  pub fn new(locale: Signal<Locale>) -> Self {
    Self { locale }
  }

  pub fn locale(&self) -> Locale {
    *self.locale.read()
  }

  pub fn set_locale(&mut self, locale: Locale) {
    self.locale.set(locale);
  }

  pub fn t(&self, key: &str) -> String {
    translate(self.locale(), key).to_string()
  }

  pub fn t_with(&self, key: &str, args: &[(&str, String)]) -> String {
    interpolate(translate(self.locale(), key), args)
  }

  pub fn date(&self, raw: Option<&str>) -> String {
    match raw.filter(|r| !r.trim().is_empty()) {
      Some(raw) => format_datetime(self.locale(), raw),
      None => "-".to_string(),
    }
  }
}

pub fn use_i18n() -> I18n {
  use_context::<I18n>()
}

const EN: &[(&str, &str)] = &[
  ("nav.brand", "Quant Console"),
  ("nav.algorithms", "Algorithms"),
  ("nav.themes", "Themes"),
  ("nav.liveTrade", "Live Trade"),
  ("nav.pool", "Bridge Pool"),
  ("nav.audit", "Audit Logs"),
  ("home.title", "Quant Console"),
  ("home.subtitle", "Manage algorithms, project themes and the live trading bridge from one place."),
  ("home.algorithms", "Register algorithms, version their parameters, diff versions and launch self-tests."),
  ("home.themes", "Curate per-project theme symbol groups, weights and system theme imports."),
  ("home.liveTrade", "Check a project's themes next to the bridge pool of the chosen trading mode."),
  ("home.pool", "Watch the Lean bridge clients for paper and live trading."),
  ("home.audit", "Browse who changed what, filtered by action and resource."),
  ("notFound.title", "Page not found"),
  ("notFound.body", "The page you requested doesn't exist."),
  ("common.save", "Save"),
  ("common.remove", "Remove"),
  ("common.search", "Search"),
  ("common.refresh", "Refresh"),
  ("common.loading", "Loading…"),
  ("common.choose", "Choose…"),
  ("common.empty", "Nothing to show."),
  ("common.createdAt", "Created"),
  ("common.updatedAt", "Updated"),
  ("common.savedItem", "Saved {name}"),
  ("pagination.prev", "Previous"),
  ("pagination.next", "Next"),
  ("pagination.page", "Page {page} of {pages}"),
  ("pagination.range", "{start}-{end} of {total}"),
  ("pagination.empty", "No rows"),
  ("pagination.perPage", "{size} / page"),
  ("algorithms.title", "Algorithms"),
  ("algorithms.name", "Name"),
  ("algorithms.description", "Description"),
  ("algorithms.language", "Language"),
  ("algorithms.typeName", "Type name"),
  ("algorithms.filePath", "File path"),
  ("algorithms.version", "Version"),
  ("algorithms.versions", "Versions"),
  ("algorithms.content", "Content"),
  ("algorithms.contentHash", "Content hash"),
  ("algorithms.create", "New algorithm"),
  ("algorithms.edit", "Edit algorithm"),
  ("algorithms.new", "Start a new one"),
  ("algorithms.newVersion", "New version"),
  ("algorithms.createVersion", "Create version"),
  ("algorithms.paramsForm", "Form"),
  ("algorithms.paramsJson", "JSON"),
  ("algorithms.copyParams", "Copy params from selected version"),
  ("algorithms.diff", "Compare versions"),
  ("algorithms.diffFrom", "From"),
  ("algorithms.diffTo", "To"),
  ("algorithms.runDiff", "Show diff"),
  ("algorithms.selfTest", "Self-test"),
  ("algorithms.selectedVersion", "Selected version"),
  ("algorithms.noVersion", "none"),
  ("algorithms.benchmark", "Benchmark"),
  ("algorithms.runSelfTest", "Run self-test"),
  ("algorithms.selfTestRunning", "Starting…"),
  ("algorithms.selfTestStarted", "Backtest run {id} started"),
  ("algorithms.createProject", "Create project from version"),
  ("algorithms.lockVersion", "Lock the project to this version"),
  ("algorithms.errors.nameRequired", "Name is required."),
  ("algorithms.errors.versionContentRequired", "Provide a version, file path, content or params."),
  ("algorithms.errors.paramsJson", "Params must be a JSON object."),
  ("algorithms.errors.paramsNumber", "A params field holds an invalid number."),
  ("algorithms.errors.diffSelection", "Pick both versions to compare."),
  ("algorithms.errors.versionRequired", "Select a version first."),
  ("algorithms.errors.projectName", "Project name is required."),
  ("algorithms.errors.save", "Saving the algorithm failed."),
  ("algorithms.errors.createVersion", "Creating the version failed."),
  ("algorithms.errors.loadVersion", "Loading the version failed."),
  ("algorithms.errors.diff", "Loading the diff failed."),
  ("algorithms.errors.selfTest", "Starting the self-test failed."),
  ("algorithms.errors.createProject", "Creating the project failed."),
  ("params.cadence", "Rebalance cadence"),
  ("params.universe", "Universe"),
  ("params.coreAllocation", "Core allocation"),
  ("params.defensiveSymbols", "Defensive symbols"),
  ("params.themeWeights", "Theme weights (KEY=weight)"),
  ("params.blend", "Blend"),
  ("params.topN", "Top N"),
  ("params.minScore", "Min score"),
  ("params.minVolume", "Min volume"),
  ("params.maxPositionWeight", "Max position weight"),
  ("params.maxDrawdown", "Max drawdown"),
  ("params.stopLoss", "Stop loss"),
  ("params.extraKeys", "Also kept: {keys}"),
  ("projects.name", "Project name"),
  ("projects.description", "Project description"),
  ("themes.projects", "Projects"),
  ("themes.pickProject", "Select a project to edit its themes."),
  ("themes.drafts", "Themes"),
  ("themes.add", "Add theme"),
  ("themes.normalize", "Normalize"),
  ("themes.weightTotal", "Total weight {total}"),
  ("themes.weightWarning", "Weights should add up to 1."),
  ("themes.key", "Key"),
  ("themes.label", "Label"),
  ("themes.weight", "Weight"),
  ("themes.priority", "Priority"),
  ("themes.keywords", "Keywords"),
  ("themes.manual", "Manual"),
  ("themes.exclude", "Excluded"),
  ("themes.noThemes", "No themes yet."),
  ("themes.systemLinked", "system"),
  ("themes.viewSymbols", "Symbols"),
  ("themes.summary", "Summary"),
  ("themes.totalSymbols", "{count} symbols"),
  ("themes.symbolCount", "Symbols"),
  ("themes.sample", "Sample"),
  ("themes.symbols", "Theme symbols"),
  ("themes.pickTheme", "Open a theme's symbols from the table."),
  ("themes.exportCsv", "Export CSV"),
  ("themes.toggleExclude", "Toggle exclusion"),
  ("themes.search", "Find a symbol"),
  ("themes.searchNone", "{symbol} is in no theme."),
  ("themes.searchHits", "{symbol} is in: {themes}"),
  ("themes.compare", "Compare themes"),
  ("themes.runCompare", "Compare"),
  ("themes.shared", "Shared ({count})"),
  ("themes.onlyA", "Only in A ({count})"),
  ("themes.onlyB", "Only in B ({count})"),
  ("themes.overrides", "Symbol type overrides"),
  ("themes.setOverride", "Set"),
  ("themes.systemThemes", "System themes"),
  ("themes.source", "Source"),
  ("themes.latestVersion", "Latest version"),
  ("themes.importMode", "Import mode"),
  ("themes.mode.follow_latest", "Follow latest"),
  ("themes.mode.pin_version", "Pin version"),
  ("themes.mode.snapshot", "Snapshot"),
  ("themes.import", "Import"),
  ("themes.refresh", "Refresh"),
  ("themes.reports", "Change reports"),
  ("themes.versionChange", "Versions"),
  ("themes.changes", "Changes"),
  ("themes.saved", "Themes saved"),
  ("themes.errors.keyRequired", "Every theme needs a key."),
  ("themes.errors.duplicateKey", "Theme keys must be unique."),
  ("themes.errors.symbolRequired", "Enter a symbol."),
  ("themes.errors.compareSelection", "Pick two themes to compare."),
  ("themes.errors.load", "Loading the project config failed."),
  ("themes.errors.save", "Saving the themes failed."),
  ("themes.errors.symbols", "Loading theme symbols failed."),
  ("themes.errors.search", "Symbol search failed."),
  ("themes.errors.import", "Importing the system theme failed."),
  ("themes.errors.refresh", "Refreshing the system theme failed."),
  ("audit.title", "Audit logs"),
  ("audit.actor", "Actor"),
  ("audit.action", "Action"),
  ("audit.resourceType", "Resource type"),
  ("audit.resourceId", "Resource ID"),
  ("audit.apply", "Filter"),
  ("audit.clear", "Clear"),
  ("audit.showDetail", "Detail"),
  ("audit.hideDetail", "Hide"),
  ("audit.errors.load", "Loading audit logs failed."),
  ("pool.title", "Lean bridge pool"),
  ("pool.mode.paper", "Paper"),
  ("pool.mode.live", "Live"),
  ("pool.summary", "{total} clients, {running} running"),
  ("pool.clientId", "Client"),
  ("pool.role", "Role"),
  ("pool.status", "Status"),
  ("pool.heartbeat", "Last heartbeat"),
  ("pool.lastOrder", "Last order"),
  ("pool.outputDir", "Output dir"),
  ("pool.lastError", "Last error"),
  ("pool.empty", "No bridge clients."),
  ("pool.errors.load", "Loading the pool status failed. Showing the last known state."),
  ("live.title", "Live trade"),
  ("live.project", "Project"),
  ("live.noSummary", "Pick a project to see its themes."),
  ("live.symbolCount", "{count} symbols"),
];

const ZH: &[(&str, &str)] = &[
  ("nav.brand", "量化控制台"),
  ("nav.algorithms", "算法"),
  ("nav.themes", "主题"),
  ("nav.liveTrade", "实盘交易"),
  ("nav.pool", "桥接池"),
  ("nav.audit", "审计日志"),
  ("home.title", "量化控制台"),
  ("home.subtitle", "在一个地方管理算法、项目主题和实盘桥接。"),
  ("home.algorithms", "登记算法，管理参数版本，对比版本并发起自测。"),
  ("home.themes", "维护项目的主题股票分组、权重以及系统主题导入。"),
  ("home.liveTrade", "查看项目主题以及所选交易模式的桥接池。"),
  ("home.pool", "监控模拟盘与实盘的 Lean 桥接客户端。"),
  ("home.audit", "按操作和资源筛选查看变更记录。"),
  ("notFound.title", "页面不存在"),
  ("notFound.body", "您访问的页面不存在。"),
  ("common.save", "保存"),
  ("common.remove", "删除"),
  ("common.search", "搜索"),
  ("common.refresh", "刷新"),
  ("common.loading", "加载中…"),
  ("common.choose", "请选择…"),
  ("common.empty", "暂无数据。"),
  ("common.createdAt", "创建时间"),
  ("common.updatedAt", "更新时间"),
  ("common.savedItem", "已保存 {name}"),
  ("pagination.prev", "上一页"),
  ("pagination.next", "下一页"),
  ("pagination.page", "第 {page} / {pages} 页"),
  ("pagination.range", "第 {start}-{end} 条，共 {total} 条"),
  ("pagination.empty", "无记录"),
  ("pagination.perPage", "每页 {size} 条"),
  ("algorithms.title", "算法"),
  ("algorithms.name", "名称"),
  ("algorithms.description", "描述"),
  ("algorithms.language", "语言"),
  ("algorithms.typeName", "类型名"),
  ("algorithms.filePath", "文件路径"),
  ("algorithms.version", "版本"),
  ("algorithms.versions", "版本列表"),
  ("algorithms.content", "内容"),
  ("algorithms.contentHash", "内容哈希"),
  ("algorithms.create", "新建算法"),
  ("algorithms.edit", "编辑算法"),
  ("algorithms.new", "重新新建"),
  ("algorithms.newVersion", "新版本"),
  ("algorithms.createVersion", "创建版本"),
  ("algorithms.paramsForm", "表单"),
  ("algorithms.paramsJson", "JSON"),
  ("algorithms.copyParams", "从所选版本复制参数"),
  ("algorithms.diff", "版本对比"),
  ("algorithms.diffFrom", "从"),
  ("algorithms.diffTo", "到"),
  ("algorithms.runDiff", "查看差异"),
  ("algorithms.selfTest", "自测"),
  ("algorithms.selectedVersion", "当前版本"),
  ("algorithms.noVersion", "未选择"),
  ("algorithms.benchmark", "基准"),
  ("algorithms.runSelfTest", "运行自测"),
  ("algorithms.selfTestRunning", "启动中…"),
  ("algorithms.selfTestStarted", "回测任务 {id} 已启动"),
  ("algorithms.createProject", "由版本创建项目"),
  ("algorithms.lockVersion", "将项目锁定到此版本"),
  ("algorithms.errors.nameRequired", "名称不能为空。"),
  ("algorithms.errors.versionContentRequired", "请填写版本号、文件路径、内容或参数。"),
  ("algorithms.errors.paramsJson", "参数必须是 JSON 对象。"),
  ("algorithms.errors.paramsNumber", "参数中存在无效数字。"),
  ("algorithms.errors.diffSelection", "请选择两个要对比的版本。"),
  ("algorithms.errors.versionRequired", "请先选择版本。"),
  ("algorithms.errors.projectName", "项目名称不能为空。"),
  ("algorithms.errors.save", "保存算法失败。"),
  ("algorithms.errors.createVersion", "创建版本失败。"),
  ("algorithms.errors.loadVersion", "加载版本失败。"),
  ("algorithms.errors.diff", "加载差异失败。"),
  ("algorithms.errors.selfTest", "启动自测失败。"),
  ("algorithms.errors.createProject", "创建项目失败。"),
  ("params.cadence", "调仓频率"),
  ("params.universe", "股票池"),
  ("params.coreAllocation", "核心仓位"),
  ("params.defensiveSymbols", "防御标的"),
  ("params.themeWeights", "主题权重 (KEY=权重)"),
  ("params.blend", "混合系数"),
  ("params.topN", "前 N 名"),
  ("params.minScore", "最低得分"),
  ("params.minVolume", "最低成交量"),
  ("params.maxPositionWeight", "单票最大权重"),
  ("params.maxDrawdown", "最大回撤"),
  ("params.stopLoss", "止损"),
  ("params.extraKeys", "其他保留字段：{keys}"),
  ("projects.name", "项目名称"),
  ("projects.description", "项目描述"),
  ("themes.projects", "项目"),
  ("themes.pickProject", "请选择项目以编辑主题。"),
  ("themes.drafts", "主题"),
  ("themes.add", "添加主题"),
  ("themes.normalize", "归一化"),
  ("themes.weightTotal", "权重合计 {total}"),
  ("themes.weightWarning", "权重合计应为 1。"),
  ("themes.key", "键"),
  ("themes.label", "名称"),
  ("themes.weight", "权重"),
  ("themes.priority", "优先级"),
  ("themes.keywords", "关键词"),
  ("themes.manual", "手动加入"),
  ("themes.exclude", "排除"),
  ("themes.noThemes", "还没有主题。"),
  ("themes.systemLinked", "系统"),
  ("themes.viewSymbols", "股票"),
  ("themes.summary", "概览"),
  ("themes.totalSymbols", "共 {count} 只股票"),
  ("themes.symbolCount", "股票数"),
  ("themes.sample", "示例"),
  ("themes.symbols", "主题股票"),
  ("themes.pickTheme", "在表格中打开某个主题的股票。"),
  ("themes.exportCsv", "导出 CSV"),
  ("themes.toggleExclude", "切换排除"),
  ("themes.search", "查找股票"),
  ("themes.searchNone", "{symbol} 不属于任何主题。"),
  ("themes.searchHits", "{symbol} 属于：{themes}"),
  ("themes.compare", "主题对比"),
  ("themes.runCompare", "对比"),
  ("themes.shared", "共有 ({count})"),
  ("themes.onlyA", "仅 A ({count})"),
  ("themes.onlyB", "仅 B ({count})"),
  ("themes.overrides", "股票类型覆盖"),
  ("themes.setOverride", "设置"),
  ("themes.systemThemes", "系统主题"),
  ("themes.source", "来源"),
  ("themes.latestVersion", "最新版本"),
  ("themes.importMode", "导入方式"),
  ("themes.mode.follow_latest", "跟随最新"),
  ("themes.mode.pin_version", "固定版本"),
  ("themes.mode.snapshot", "快照"),
  ("themes.import", "导入"),
  ("themes.refresh", "刷新"),
  ("themes.reports", "变更报告"),
  ("themes.versionChange", "版本"),
  ("themes.changes", "变更"),
  ("themes.saved", "主题已保存"),
  ("themes.errors.keyRequired", "每个主题都需要键。"),
  ("themes.errors.duplicateKey", "主题键不能重复。"),
  ("themes.errors.symbolRequired", "请输入股票代码。"),
  ("themes.errors.compareSelection", "请选择两个要对比的主题。"),
  ("themes.errors.load", "加载项目配置失败。"),
  ("themes.errors.save", "保存主题失败。"),
  ("themes.errors.symbols", "加载主题股票失败。"),
  ("themes.errors.search", "股票搜索失败。"),
  ("themes.errors.import", "导入系统主题失败。"),
  ("themes.errors.refresh", "刷新系统主题失败。"),
  ("audit.title", "审计日志"),
  ("audit.actor", "操作人"),
  ("audit.action", "操作"),
  ("audit.resourceType", "资源类型"),
  ("audit.resourceId", "资源 ID"),
  ("audit.apply", "筛选"),
  ("audit.clear", "清除"),
  ("audit.showDetail", "详情"),
  ("audit.hideDetail", "收起"),
  ("audit.errors.load", "加载审计日志失败。"),
  ("pool.title", "Lean 桥接池"),
  ("pool.mode.paper", "模拟盘"),
  ("pool.mode.live", "实盘"),
  ("pool.summary", "共 {total} 个客户端，{running} 个运行中"),
  ("pool.clientId", "客户端"),
  ("pool.role", "角色"),
  ("pool.status", "状态"),
  ("pool.heartbeat", "最近心跳"),
  ("pool.lastOrder", "最近订单"),
  ("pool.outputDir", "输出目录"),
  ("pool.lastError", "最近错误"),
  ("pool.empty", "没有桥接客户端。"),
  ("pool.errors.load", "加载桥接池状态失败，显示的是上次的状态。"),
  ("live.title", "实盘交易"),
  ("live.project", "项目"),
  ("live.noSummary", "选择项目以查看其主题。"),
  ("live.symbolCount", "{count} 只股票"),
];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn locale_codes_parse_case_insensitively() {
    assert_eq!("zh-CN".parse::<Locale>(), Ok(Locale::Zh));
    assert_eq!(Locale::from_str(" EN-us "), Ok(Locale::En));
    assert!("fr".parse::<Locale>().is_err());
  }

  #[test]
  fn missing_keys_fall_back_to_english_then_key() {
    assert_eq!(translate(Locale::Zh, "nav.themes"), "主题");
    assert_eq!(translate(Locale::En, "no.such.key"), "no.such.key");
  }

  #[test]
  fn every_english_key_is_translated() {
    for (key, _) in EN {
      assert!(ZH.iter().any(|(k, _)| k == key), "missing zh translation for {key}");
    }
    assert_eq!(EN.len(), ZH.len());
  }

  #[test]
  fn placeholders_are_filled() {
    let text = interpolate(translate(Locale::En, "pagination.range"), &[("start", "21".into()), ("end", "40".into()), ("total", "95".into())]);
    assert_eq!(text, "21-40 of 95");
  }

  #[test]
  fn dates_follow_the_locale() {
    assert_eq!(format_datetime(Locale::En, "2024-03-05T14:07:09Z"), "2024-03-05 14:07");
    assert_eq!(format_datetime(Locale::Zh, "2024-03-05T14:07:09.123"), "2024年03月05日 14:07");
    assert_eq!(format_datetime(Locale::En, "2024-03-05 14:07:09"), "2024-03-05 14:07");
    assert_eq!(format_datetime(Locale::En, "yesterday"), "yesterday");
  }

  #[test]
  fn blank_values_render_as_dash() {
    assert_eq!(dash(None), "-");
    assert_eq!(dash(Some("  ")), "-");
    assert_eq!(dash(Some("paper")), "paper");
  }
}
