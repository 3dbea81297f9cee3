//! Subcommand implementations.

use anyhow::{Context, bail};
use revo_core::catalog::{CATALOG, CatalogError, ServiceSelection, find_option};
use revo_core::draft::VoiceNote;
use revo_core::events::BookingStage;
use revo_core::finalize::FinalizeError;
use revo_core::revision::{DesignUpdate, submit_update};
use revo_core::session::{BookingPipeline, BookingSession, SubmissionResult};
use revo_core::status::{DesignStatusPoller, DownloadProgress, OrderStatus, ProgressStep};
use revo_sdk::client::BackendClient;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LoadedConfig;
use crate::gateway::TerminalGateway;
use crate::media::DirectoryLibrary;
use crate::shutdown;
use crate::terminal::Terminal;

/// A recorded voice note given as `path[=seconds]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceArg {
    pub path: PathBuf,
    pub duration: Duration,
}

pub fn parse_voice(raw: &str) -> Result<VoiceArg, String> {
    let (path, seconds) = match raw.rsplit_once('=') {
        Some((path, seconds)) => (path, Some(seconds)),
        None => (raw, None),
    };
    if path.is_empty() {
        return Err("missing voice note path".to_string());
    }

    let duration = match seconds {
        None => Duration::ZERO,
        Some(s) => {
            let secs: f64 = s
                .parse()
                .map_err(|_| format!("invalid duration '{s}', expected seconds"))?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(format!("invalid duration '{s}', expected seconds"));
            }
            Duration::from_secs_f64(secs)
        }
    };

    Ok(VoiceArg {
        path: PathBuf::from(path),
        duration,
    })
}

pub fn services() {
    for tier in CATALOG {
        println!("₹{} ({} delivery)", tier.price, tier.turnaround);
        for option in tier.options {
            println!("  - {option}");
        }
    }
}

fn stage_label(stage: BookingStage) -> &'static str {
    match stage {
        BookingStage::Draft => "Preparing booking",
        BookingStage::IntentCreated => "Payment order created",
        BookingStage::GatewayOpen => "Waiting for payment",
        BookingStage::PaymentCaptured => "Payment received",
        BookingStage::Finalizing => "Confirming booking",
        BookingStage::Succeeded => "Booking confirmed",
        BookingStage::SucceededButUnconfirmed => "Booking not confirmed",
        BookingStage::PaymentFailed => "Payment not completed",
        BookingStage::IntentCreationFailed => "Could not start payment",
    }
}

fn select_services(names: &[String]) -> Result<ServiceSelection, CatalogError> {
    let mut selection = ServiceSelection::new();
    for name in names {
        let (canonical, _) =
            find_option(name).ok_or_else(|| CatalogError::UnknownOption(name.clone()))?;
        if !selection.options().iter().any(|o| o == canonical) {
            selection.toggle(canonical)?;
        }
    }
    Ok(selection)
}

pub async fn book(
    config: LoadedConfig,
    options: Vec<String>,
    description: String,
    images: Vec<PathBuf>,
    voices: Vec<VoiceArg>,
) -> anyhow::Result<()> {
    let (selected, total) = select_services(&options)?.into_parts();
    println!("Booking {} for ₹{total}", selected.join(", "));

    let mut session = BookingSession::new(selected, total);
    let draft = session.draft_mut();
    draft.set_description(description);
    for image in images {
        draft.add_image(image);
    }
    for voice in voices {
        draft.add_voice_note(voice.path, voice.duration);
    }

    let terminal = Terminal::new();
    let gateway = Arc::new(TerminalGateway::new(terminal.clone()));
    let pipeline = BookingPipeline::new(
        BackendClient::new(config.backend),
        config.booking,
        gateway,
        config.customer,
    );

    let mut stages = session.subscribe();
    let progress = tokio::spawn(async move {
        while stages.changed().await.is_ok() {
            let stage = *stages.borrow_and_update();
            eprintln!("  · {}", stage_label(stage));
        }
    });

    loop {
        let finished = tokio::select! {
            result = session.submit(&pipeline) => Some(result.map(|_| ())),
            _ = shutdown::interrupted() => None,
        };

        match finished {
            Some(result) => result?,
            None => {
                tracing::warn!(session = %session.id(), stage = %session.stage(), "Booking abandoned");
                if let Some(proof) = session.proof() {
                    eprintln!(
                        "Interrupted after payment. Contact support with payment id {}.",
                        proof.payment_id
                    );
                }
                bail!("booking abandoned");
            }
        }

        if session.stage() != BookingStage::SucceededButUnconfirmed {
            break;
        }

        println!("{}", session.result().user_message());
        let too_large = matches!(
            session.result(),
            SubmissionResult::SucceededButUnconfirmed {
                failure: FinalizeError::PayloadTooLarge,
                ..
            }
        );
        if too_large {
            if !terminal
                .confirm("Send the booking again without attachments? [y/N] ")
                .await?
            {
                break;
            }
            let draft = session.draft_mut();
            let images: Vec<PathBuf> = draft
                .draft()
                .reference_images
                .iter()
                .map(|a| a.path.clone())
                .collect();
            for image in images {
                draft.remove_image(&image);
            }
            draft.clear_voice_notes();
        } else if !terminal.confirm("Retry confirming the booking? [y/N] ").await? {
            break;
        }
    }

    let succeeded = matches!(session.result(), SubmissionResult::Succeeded { .. });
    let message = session.result().user_message();
    drop(session);
    let _ = progress.await;

    if !succeeded {
        bail!(message);
    }
    println!("{message}");
    Ok(())
}

fn display_id(order: &OrderStatus) -> &str {
    order.custom_order_id.as_deref().unwrap_or(&order.order_id)
}

/// `Research > [Design] > Testing > Completed`
fn tracker(current: ProgressStep) -> String {
    ProgressStep::ALL
        .iter()
        .map(|step| {
            if *step == current {
                format!("[{}]", step.label())
            } else {
                step.label().to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

pub async fn orders(config: LoadedConfig) -> anyhow::Result<()> {
    let poller = DesignStatusPoller::new(BackendClient::new(config.backend), config.customer.email);
    let orders = poller.list_orders().await?;

    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }
    for order in &orders {
        println!(
            "{:<10} {:<32} {:<12} {}",
            display_id(order),
            order.checked_option.as_deref().unwrap_or("-"),
            order.status,
            order
                .delivery_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    Ok(())
}

pub async fn status(config: LoadedConfig, order_id: String) -> anyhow::Result<()> {
    let poller = DesignStatusPoller::new(BackendClient::new(config.backend), config.customer.email);
    let order = poller.fetch_status(&order_id).await?;

    println!("Order     {}", display_id(&order));
    if let Some(option) = &order.checked_option {
        println!("Service   {option}");
    }
    if let Some(date) = order.order_date() {
        println!("Ordered   {date}");
    }
    if let Some(date) = order.delivery_date() {
        println!("Delivery  {date}");
    }
    println!("Status    {}", order.status);
    println!("Progress  {}", tracker(order.progress_step()));
    if let Some(url) = &order.preview_image_url {
        println!("Preview   {url}");
    }
    Ok(())
}

fn report_progress(progress: DownloadProgress) {
    let mut stderr = std::io::stderr();
    let _ = match progress.total {
        Some(total) if total > 0 => write!(
            stderr,
            "\r  {} / {} bytes ({}%)",
            progress.received,
            total,
            progress.received * 100 / total
        ),
        _ => write!(stderr, "\r  {} bytes", progress.received),
    };
    let _ = stderr.flush();
}

pub async fn preview(config: LoadedConfig, order_id: String, download: bool) -> anyhow::Result<()> {
    let poller = DesignStatusPoller::new(BackendClient::new(config.backend), config.customer.email);
    let url = poller.fetch_preview_image(&order_id).await?;
    println!("{url}");

    if download {
        let library = DirectoryLibrary::new(&config.download_dir);
        let saved = poller
            .download_preview_image(url, &library, report_progress)
            .await
            .with_context(|| format!("failed to download preview of order {order_id}"))?;
        eprintln!();
        println!("Saved to {}", saved.display());
    }
    Ok(())
}

pub async fn update(
    config: LoadedConfig,
    order_id: String,
    description: String,
    voices: Vec<VoiceArg>,
) -> anyhow::Result<()> {
    let client = BackendClient::new(config.backend);
    let update = voices.into_iter().fold(
        DesignUpdate::new(order_id, description),
        |update, voice| update.with_voice_note(VoiceNote::new(voice.path, voice.duration)),
    );

    submit_update(&client, &update).await?;
    println!("Update sent for order {}.", update.order_id);
    Ok(())
}
