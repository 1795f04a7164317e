use std::sync::Arc;

use eframe::{egui, App, CreationContext, Frame};
use egui::{Align, Align2, Color32, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Size, StripBuilder};
use log::{debug, warn};

use crate::client::RecommendationService;
use crate::config::ClientConfig;
use crate::dispatch::{Completion, Dispatcher};
use crate::models::{CardKind, FieldEdit, Goal, Profile, ProfileField, RecommendationCard};
use crate::session::{Session, Ticket, View};

enum ServiceStatus {
    Checking,
    Online(String),
    Offline,
}

/// Text typed into the numeric inputs, in `ProfileField::NUMERIC` order.
///
/// Every box that parses has already been pushed into the session profile, so
/// the profile always holds the leading integer of each box. A box that does
/// not parse blocks submitting until it is fixed.
struct NumericInputs {
    text: [String; 3],
}

impl NumericInputs {
    fn from_profile(profile: &Profile) -> Self {
        NumericInputs {
            text: ProfileField::NUMERIC.map(|field| profile.value(field).to_string()),
        }
    }

    fn text_mut(&mut self, index: usize) -> &mut String {
        &mut self.text[index]
    }

    fn parsed(&self, index: usize) -> Option<FieldEdit> {
        FieldEdit::parse(ProfileField::NUMERIC[index], &self.text[index])
    }

    fn is_valid(&self, index: usize) -> bool {
        self.parsed(index).is_some()
    }

    fn all_valid(&self) -> bool {
        (0..self.text.len()).all(|index| self.is_valid(index))
    }

    fn commit(&self, index: usize, session: &mut Session) {
        match self.parsed(index) {
            Some(edit) => session.update_field(edit),
            None => debug!(
                "no integer in {:?} for {:?}, submit blocked",
                self.text[index],
                ProfileField::NUMERIC[index]
            ),
        }
    }

    /// Starts a request only when every box holds an integer.
    fn begin_submit(&self, session: &mut Session) -> Option<Ticket> {
        if !self.all_valid() {
            debug!("submit refused, a numeric input has no integer");
            return None;
        }
        session.begin_submit()
    }
}

pub struct FitnessApp {
    session: Session,
    dispatcher: Dispatcher,
    inputs: NumericInputs,
    service_url: String,
    service_status: ServiceStatus,
}

impl FitnessApp {
    pub fn new(
        cc: &CreationContext,
        config: &ClientConfig,
        service: Arc<dyn RecommendationService>,
    ) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::new(18.0, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::new(30.0, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::new(18.0, egui::FontFamily::Proportional),
        );
        cc.egui_ctx.set_style(style);

        let repaint_ctx = cc.egui_ctx.clone();
        let dispatcher = Dispatcher::new(service).with_waker(move || repaint_ctx.request_repaint());
        dispatcher.check_health();

        let session = Session::default();
        let inputs = NumericInputs::from_profile(session.profile());
        FitnessApp {
            session,
            dispatcher,
            inputs,
            service_url: config.service_base_url.clone(),
            service_status: ServiceStatus::Checking,
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Recommendation { generation, result } => {
                let outcome = self.session.complete(generation, result);
                debug!("recommendation completion: {:?}", outcome);
            }
            Completion::Health(Ok(message)) => {
                self.service_status = ServiceStatus::Online(message);
            }
            Completion::Health(Err(e)) => {
                warn!("recommendation service health check failed: {}", e);
                self.service_status = ServiceStatus::Offline;
            }
        }
    }

    fn submit(&mut self) {
        if let Some(ticket) = self.inputs.begin_submit(&mut self.session) {
            self.dispatcher.submit(ticket);
        }
    }
}

impl App for FitnessApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        for completion in self.dispatcher.poll() {
            self.handle_completion(completion);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(Layout::top_down(Align::Center), |ui| {
                ui.add_space(20.0);
                ui.label(
                    RichText::new("Personalized Fitness AI")
                        .heading()
                        .size(44.0)
                        .strong(),
                );
                ui.label(
                    RichText::new("Get custom workout and nutrition plans powered by machine learning.")
                        .weak(),
                );
                ui.add_space(30.0);

                match self.session.view() {
                    View::Form => self.show_form_display(ui),
                    View::Results => self.show_results_display(ui),
                }
            });
        });

        self.show_notice(ctx);
    }
}

impl FitnessApp {
    fn show_form_display(&mut self, ui: &mut Ui) {
        ui.label(
            RichText::new("Configure Your Profile")
                .heading()
                .strong(),
        );
        match &self.service_status {
            ServiceStatus::Checking => ui.label(RichText::new(format!("Contacting {}...", self.service_url)).weak()),
            ServiceStatus::Online(message) => ui.label(RichText::new(message).color(Color32::LIGHT_GREEN)),
            ServiceStatus::Offline => ui.label(
                RichText::new(format!("Service offline at {}", self.service_url)).color(Color32::LIGHT_RED),
            ),
        };
        ui.add_space(20.0);

        let busy = self.session.is_busy();
        ui.add_enabled_ui(!busy, |ui| {
            let current = self.session.profile().goal;
            let mut selected = current;
            egui::ComboBox::from_label(ProfileField::Goal.label())
                .selected_text(current.label())
                .width(260.0)
                .show_ui(ui, |ui| {
                    for goal in Goal::ALL {
                        ui.selectable_value(&mut selected, goal, goal.label());
                    }
                });
            if selected != current {
                self.session.update_field(FieldEdit::Goal(selected));
            }
            ui.add_space(10.0);

            for (index, field) in ProfileField::NUMERIC.into_iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(field.label());
                    let response = ui.add(
                        egui::TextEdit::singleline(self.inputs.text_mut(index)).desired_width(80.0),
                    );
                    if response.changed() {
                        self.inputs.commit(index, &mut self.session);
                    }
                    if self.inputs.is_valid(index) {
                        let (low, high) = field.bounds();
                        ui.label(RichText::new(format!("{}-{}", low, high)).weak());
                    } else {
                        ui.colored_label(Color32::LIGHT_RED, "enter a whole number");
                    }
                });
            }
        });
        ui.add_space(20.0);

        let label = if busy {
            RichText::new("Fetching recommendations...")
        } else {
            RichText::new("Get Recommendations →").strong()
        };
        let ready = !busy && self.inputs.all_valid();
        if ui.add_enabled(ready, egui::Button::new(label)).clicked() {
            self.submit();
        }
        if busy {
            ui.spinner();
        }
    }

    fn show_results_display(&mut self, ui: &mut Ui) {
        let mut reset = false;
        if let Some(results) = self.session.results() {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Your Recommendations")
                        .heading()
                        .size(34.0)
                        .strong(),
                );
                ui.add_space(20.0);
                if ui.button("Reset Profile").clicked() {
                    reset = true;
                }
            });
            ui.label(
                RichText::new(format!(
                    "{} plan, {} recommendations, generated at {}",
                    self.session.profile().goal.label(),
                    results.bundle.card_count(),
                    results.received_at.format("%H:%M:%S")
                ))
                .weak(),
            );
            ui.add_space(20.0);

            ScrollArea::vertical().show(ui, |ui| {
                ui.set_width(ui.available_width().min(720.0));
                for kind in CardKind::ALL {
                    ui.label(RichText::new(kind.heading()).heading().size(26.0).strong());
                    for card in results.bundle.cards().filter(|card| card.kind() == kind) {
                        show_card(ui, card);
                    }
                    ui.add_space(30.0);
                }
            });
        }
        if reset {
            self.session.reset();
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.session.notice().map(str::to_owned) else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Recommendations unavailable")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice);
                ui.add_space(10.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.session.dismiss_notice();
        }
    }
}

fn show_card(ui: &mut Ui, card: RecommendationCard) {
    let (kind, accent) = match card.kind() {
        CardKind::Workout => ("workout", Color32::LIGHT_BLUE),
        CardKind::Nutrition => ("nutrition", Color32::LIGHT_GREEN),
    };
    ui.push_id((kind, card.title()), |ui| {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(card.title()).size(22.0).strong());
            ui.label(RichText::new(card.description()).weak());
            ui.add_space(8.0);

            let stats = card.stats();
            ui.allocate_ui(egui::vec2(ui.available_width(), 48.0), |ui| {
                StripBuilder::new(ui)
                    .sizes(Size::remainder(), stats.len())
                    .horizontal(|mut strip| {
                        for stat in &stats {
                            strip.cell(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(RichText::new(stat.label).small().weak());
                                    ui.label(RichText::new(&stat.value).color(accent).strong());
                                });
                            });
                        }
                    });
            });
        });
    });
    ui.add_space(12.0);
}
