use std::{
    collections::VecDeque,
    sync::{mpsc::Receiver, Arc, Mutex, PoisonError},
    thread,
};

use eframe::CreationContext;
use egui::plot::{Legend, Line, Plot};

/// State sent to the GUI renderer after each epoch of training
/// (epoch, training cost, test accuracy)
pub type EpochState = (usize, f64, Option<f64>);

/// Any type that can be rendered and updated during training
pub trait Visualizer: eframe::App + 'static {
    const DATA_LIMIT: usize = 20_000;
    fn new(cc: &CreationContext, rx: Receiver<EpochState>) -> Self;
}

/// Default gui that plots cost and test accuracy while training
pub struct NNGui {
    data: Arc<Mutex<VecDeque<EpochState>>>,
}

impl Visualizer for NNGui {
    /// Initialize NNGui, but also start a thread that listens to a receiver and updates the state
    fn new(cc: &CreationContext, rx: Receiver<EpochState>) -> Self {
        let data = Arc::new(Mutex::new(VecDeque::new()));
        let data_clone = data.clone();

        let ctx = cc.egui_ctx.clone();
        thread::spawn(move || {
            // ends once the training thread drops its sender
            while let Ok(x) = rx.recv() {
                let mut data = data_clone.lock().unwrap_or_else(PoisonError::into_inner);

                if data.len() == Self::DATA_LIMIT {
                    data.pop_front();
                }

                data.push_back(x);
                ctx.request_repaint()
            }
        });

        Self { data }
    }
}

impl eframe::App for NNGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let data = self.get_data();
        let cost: Vec<_> = data.iter().map(|&(i, c, _)| [i as f64, c]).collect();
        let accuracy: Vec<_> = data
            .iter()
            .filter_map(|&(i, _, a)| a.map(|a| [i as f64, a]))
            .collect();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical(|ui| {
                match data.last() {
                    Some((i, c, Some(a))) => {
                        ui.heading(format!("Epoch {i} cost: {c:.6}, accuracy: {:.2}%", a * 100.0))
                    }
                    Some((i, c, None)) => ui.heading(format!("Epoch {i} cost: {c:.6}")),
                    None => ui.heading("Waiting for the first epoch"),
                };
                Plot::new("Training")
                    .legend(Legend::default())
                    .show(ui, |plot_ui| {
                        plot_ui.line(Line::new(cost).name("cost"));
                        plot_ui.line(Line::new(accuracy).name("accuracy"));
                    });
            });
        });
    }
}

impl NNGui {
    /// Returns a clone of the data as a vec
    /// Blocks until it can get a lock on its state data
    pub fn get_data(&self) -> Vec<EpochState> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }
}
