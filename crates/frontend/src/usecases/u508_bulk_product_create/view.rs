use contracts::usecases::u508_bulk_product_create::catalog::{
    sub_categories, BREEDER_OPTIONS, MAIN_CATEGORIES, SEX_OPTIONS,
};
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u508_bulk_product_create::{BulkProductCreate, FieldKey};
use leptos::prelude::*;
use leptos::task::spawn_local;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use thaw::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

use super::api::HttpCreateProductApi;
use super::config::BulkEditorConfig;
use super::engine::{RunOutcome, RunSummary, SubmissionEngine};
use super::row::{Attachment, DraftRow, RowId, RowStatus};
use super::session::BulkSession;
use super::storage::{BrowserStorage, BrowserTimer};
use super::store::BulkStats;

type EditorSession = BulkSession<BrowserStorage, BrowserTimer>;
type SessionHandle = StoredValue<EditorSession, LocalStorage>;

fn run_message(summary: &RunSummary) -> String {
    if summary.all_done {
        return format!("All {} product(s) created.", summary.succeeded);
    }
    let mut message = format!(
        "Created {}, failed {}, rejected {}.",
        summary.succeeded, summary.failed, summary.rejected
    );
    if !summary.warnings.is_empty() {
        message.push_str(&format!(" {} created with warnings.", summary.warnings.len()));
    }
    message
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

async fn read_attachment(file: web_sys::File) -> Result<Attachment, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(Attachment::new(file.name(), file.type_(), bytes))
}

#[component]
pub fn BulkProductEditor() -> impl IntoView {
    let config = BulkEditorConfig::default();
    let pool_width = config.effective_pool_width();
    let max_rows = config.max_rows;

    let editor = BulkSession::open(BrowserStorage, BrowserTimer, &config);
    let (rows, set_rows) = signal(editor.rows());
    editor.set_listener(move |current| set_rows.set(current.to_vec()));
    let session: SessionHandle = StoredValue::new_local(editor);

    let (running, set_running) = signal(false);
    let (notice, set_notice) = signal(String::new());
    let (generate_count, set_generate_count) = signal(config.generate_default_count.to_string());

    let stats = Memo::new(move |_| rows.with(|current| BulkStats::from_rows(current)));

    let on_add = move |_| {
        if let Err(e) = session.get_value().create() {
            set_notice.set(e.to_string());
        }
    };

    let on_generate = move |_| {
        let count = generate_count.get().trim().parse::<usize>().unwrap_or(0);
        if count == 0 {
            set_notice.set("Enter how many rows to generate.".to_string());
            return;
        }
        let mut rng = SmallRng::seed_from_u64(random_seed());
        let generated = session.get_value().generate(count, &mut rng);
        if generated < count {
            set_notice.set(format!(
                "Limit reached: max {} products at a time. Generated {}.",
                max_rows, generated
            ));
        } else {
            set_notice.set(String::new());
        }
    };

    let on_submit = move |_| {
        let editor = session.get_value();
        set_notice.set(String::new());
        set_running.set(true);
        spawn_local(async move {
            let engine = SubmissionEngine::new(HttpCreateProductApi, pool_width);
            let message = match engine.run(&editor).await {
                RunOutcome::NothingToSubmit => "Nothing to submit.".to_string(),
                RunOutcome::AlreadyRunning => "An upload is already running.".to_string(),
                RunOutcome::Finished(summary) => run_message(&summary),
            };
            set_notice.set(message);
            set_running.set(editor.is_running());
        });
    };

    let on_clear_completed = move |_| {
        let removed = session.get_value().clear_completed();
        set_notice.set(format!("Removed {} completed row(s).", removed));
    };

    let on_clear_all = move |_| {
        if confirm("Remove every row? Unsaved images will be lost.") {
            session.get_value().clear_all();
            set_notice.set(String::new());
        }
    };

    let submit_disabled = Signal::derive(move || running.get() || stats.get().pending() == 0);
    let add_disabled = Signal::derive(move || running.get() || stats.get().total >= max_rows);
    let clear_completed_disabled = Signal::derive(move || running.get() || stats.get().done == 0);
    let running_signal = Signal::derive(move || running.get());
    let page_id = format!("{}--usecase", BulkProductCreate::full_name());
    let title = format!(
        "{}: {}",
        BulkProductCreate::usecase_index(),
        BulkProductCreate::display_name()
    );

    view! {
        <div class="page" id=page_id data-page-category="usecase">
            <div class="card">
                <div class="card__body">
                    <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center>
                        <h2 class="section-title">{title}</h2>
                        <Space>
                            {view! {
                                <Button
                                    appearance=ButtonAppearance::Primary
                                    on_click=on_submit
                                    disabled=submit_disabled
                                >
                                    {move || if running.get() {
                                        "Uploading...".to_string()
                                    } else {
                                        format!("Submit {} product(s)", stats.get().pending())
                                    }}
                                </Button>
                            }
                            .into_any()}
                        </Space>
                    </Flex>

                    <Flex align=FlexAlign::Center>
                        <Button appearance=ButtonAppearance::Secondary on_click=on_add disabled=add_disabled>
                            "+ Add row"
                        </Button>
                        <input
                            class="form__input"
                            type="number"
                            min="1"
                            style="width: 80px;"
                            prop:value=move || generate_count.get()
                            on:input=move |ev| set_generate_count.set(event_target_value(&ev))
                        />
                        <Button appearance=ButtonAppearance::Secondary on_click=on_generate disabled=running_signal>
                            "Generate"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=on_clear_completed
                            disabled=clear_completed_disabled
                        >
                            "Clear completed"
                        </Button>
                        <Button appearance=ButtonAppearance::Secondary on_click=on_clear_all disabled=running_signal>
                            "Clear all"
                        </Button>
                    </Flex>

                    <div class="progress-section">
                        <div class="progress-bar">
                            <div
                                class="progress-bar__fill"
                                style=move || format!("width: {}%", stats.get().progress_percent())
                            ></div>
                        </div>
                        <div class="progress-stats">
                            {move || {
                                let s = stats.get();
                                format!(
                                    "{} rows (max {}) | {} done | {} uploading | {} failed | {} pending",
                                    s.total, max_rows, s.done, s.submitting, s.failed, s.pending()
                                )
                            }}
                        </div>
                    </div>

                    {move || {
                        let missing = stats.get().missing_images;
                        (missing > 0).then(|| view! {
                            <div class="warning-box">
                                <span class="warning-box__icon">"⚠"</span>
                                <span class="warning-box__text">
                                    {format!("{} row(s) have no image. Images are not kept across page reloads.", missing)}
                                </span>
                            </div>
                        })
                    }}

                    {move || {
                        let text = notice.get();
                        (!text.is_empty()).then(|| view! {
                            <div class="info-box">{text}</div>
                        })
                    }}

                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"#"</TableHeaderCell>
                                <TableHeaderCell>"Image"</TableHeaderCell>
                                {FieldKey::ALL.iter().map(|key| view! {
                                    <TableHeaderCell>{key.label()}</TableHeaderCell>
                                }).collect_view()}
                                <TableHeaderCell>"Status"</TableHeaderCell>
                                <TableHeaderCell>""</TableHeaderCell>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=move || rows.get()
                                key=|row: &DraftRow| row.id.clone()
                                children=move |row: DraftRow| view! {
                                    <DraftRowView id=row.id rows=rows session=session />
                                }
                            />
                        </TableBody>
                    </Table>
                </div>
            </div>
        </div>
    }
}

/// One table row. Reads its current state from `rows` by id so the
/// inputs keep focus while the list is re-rendered.
#[component]
fn DraftRowView(id: RowId, rows: ReadSignal<Vec<DraftRow>>, session: SessionHandle) -> impl IntoView {
    let row = {
        let id = id.clone();
        Memo::new(move |_| rows.with(|current| current.iter().find(|r| r.id == id).cloned()))
    };
    let position = {
        let id = id.clone();
        move || {
            rows.with(|current| current.iter().position(|r| r.id == id))
                .map(|index| (index + 1).to_string())
                .unwrap_or_default()
        }
    };
    let locked = move || row.with(|r| r.as_ref().map_or(true, |r| !r.status.is_editable()));

    let on_remove = {
        let id = id.clone();
        move |_| {
            session.get_value().remove(&id);
        }
    };
    let remove_disabled =
        Signal::derive(move || row.with(|r| r.as_ref().map_or(true, |r| r.status == RowStatus::Submitting)));

    let on_file = {
        let id = id.clone();
        move |ev: leptos::ev::Event| {
            let input: HtmlInputElement = event_target(&ev);
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let id = id.clone();
            spawn_local(async move {
                match read_attachment(file).await {
                    Ok(attachment) => {
                        log::debug!("Row {}: attached {:?}", id, attachment);
                        session.get_value().set_attachment(&id, Some(attachment));
                    }
                    Err(e) => log::error!("Row {}: {}", id, e),
                }
            });
        }
    };

    let image_label = move || {
        row.with(|r| match r {
            Some(DraftRow {
                attachment: Some(attachment),
                ..
            }) => attachment.file_name.clone(),
            Some(r) if !r.fields.title.trim().is_empty() => "Missing image".to_string(),
            _ => String::new(),
        })
    };

    view! {
        <TableRow>
            <TableCell><TableCellLayout>{position}</TableCellLayout></TableCell>
            <TableCell>
                <TableCellLayout>
                    <input type="file" accept="image/*" prop:disabled=locked on:change=on_file />
                    <span class="form__hint">{image_label}</span>
                </TableCellLayout>
            </TableCell>
            {text_cell(FieldKey::Title, "text", id.clone(), row, session)}
            {text_cell(FieldKey::Description, "text", id.clone(), row, session)}
            {text_cell(FieldKey::Price, "number", id.clone(), row, session)}
            {select_cell(FieldKey::MainCategory, || MAIN_CATEGORIES, id.clone(), row, session)}
            {select_cell(
                FieldKey::SubCategory,
                move || row.with(|r| r.as_ref().map_or(&[][..], |r| sub_categories(&r.fields.main_category))),
                id.clone(),
                row,
                session,
            )}
            {select_cell(FieldKey::Breeder, || BREEDER_OPTIONS, id.clone(), row, session)}
            {select_cell(FieldKey::Sex, || SEX_OPTIONS, id.clone(), row, session)}
            {text_cell(FieldKey::Age, "number", id.clone(), row, session)}
            {text_cell(FieldKey::SizeCm, "number", id.clone(), row, session)}
            {text_cell(FieldKey::SizeIn, "number", id.clone(), row, session)}
            <TableCell>
                <TableCellLayout>
                    {move || row.with(|r| r.as_ref().map(|r| status_badge(r.status)))}
                    {move || row.with(|r| r.as_ref().and_then(|r| r.last_error.clone())).map(|e| view! {
                        <div class="form__error">{e}</div>
                    })}
                </TableCellLayout>
            </TableCell>
            <TableCell>
                <Button appearance=ButtonAppearance::Secondary on_click=on_remove disabled=remove_disabled>
                    "Delete"
                </Button>
            </TableCell>
        </TableRow>
    }
}

fn status_badge(status: RowStatus) -> AnyView {
    let color = match status {
        RowStatus::Draft => BadgeColor::Informative,
        RowStatus::Submitting => BadgeColor::Brand,
        RowStatus::Done => BadgeColor::Success,
        RowStatus::Failed => BadgeColor::Danger,
    };
    view! {
        <Badge appearance=BadgeAppearance::Tint color=color>{status.label()}</Badge>
    }
    .into_any()
}

fn field_value(row: Memo<Option<DraftRow>>, key: FieldKey) -> String {
    row.with(|r| r.as_ref().map(|r| r.fields.get(key).to_string()).unwrap_or_default())
}

fn is_locked(row: Memo<Option<DraftRow>>) -> bool {
    row.with(|r| r.as_ref().map_or(true, |r| !r.status.is_editable()))
}

fn text_cell(
    key: FieldKey,
    input_type: &'static str,
    id: RowId,
    row: Memo<Option<DraftRow>>,
    session: SessionHandle,
) -> impl IntoView {
    view! {
        <TableCell>
            <input
                class="form__input"
                type=input_type
                placeholder=key.label()
                prop:value=move || field_value(row, key)
                prop:disabled=move || is_locked(row)
                on:input=move |ev| {
                    session.get_value().update(&id, key, event_target_value(&ev));
                }
            />
        </TableCell>
    }
}

fn select_cell(
    key: FieldKey,
    options: impl Fn() -> &'static [&'static str] + Send + Sync + 'static,
    id: RowId,
    row: Memo<Option<DraftRow>>,
    session: SessionHandle,
) -> impl IntoView {
    view! {
        <TableCell>
            <select
                class="form__select"
                prop:disabled=move || is_locked(row)
                on:change=move |ev| {
                    session.get_value().update(&id, key, event_target_value(&ev));
                }
            >
                <option value="" selected=move || field_value(row, key).is_empty()>"-"</option>
                {move || options().iter().map(|option| {
                    let option = *option;
                    view! {
                        <option value=option selected=move || field_value(row, key) == option>
                            {option}
                        </option>
                    }
                }).collect_view()}
            </select>
        </TableCell>
    }
}
