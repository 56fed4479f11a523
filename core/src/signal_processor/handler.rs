use super::CombatSignal;

/// Receives combat signals from the game hook.
pub trait SignalHandler {
    fn handle_signal(&mut self, signal: &CombatSignal);

    fn handle_signals(&mut self, signals: &[CombatSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}
