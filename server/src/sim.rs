use bevy::prelude::*;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::info;

use common::protocol::{ClientCommand, PlayerId, Team};

use crate::events::{BombDefused, BombExploded, BombPlanted, PlayerJoined, PlayerLeft, RoundEnd, RoundStart};
use crate::resources::{PlayerInfo, PlayerRoster};

// ============================================================================
// Match Simulation
// ============================================================================
//
// Stands in for the real game server: joins a handful of players, runs two
// bomb rounds on a fixed script, and logs what each fake client receives. In
// a real deployment the engine's own dispatch replaces this module.

// Engine round end reasons carried through to the logs.
const REASON_TARGET_BOMBED: i32 = 1;
const REASON_BOMB_DEFUSED: i32 = 7;

// One scripted host action.
enum SimAction {
    Join { id: u32, name: &'static str, team: Team, bot: bool },
    Leave { id: u32 },
    StartRound,
    PlantBomb,
    DefuseBomb,
    ExplodeBomb,
    EndRound { winner: Team, reason: i32 },
    Finish,
}

struct SimStep {
    at_secs: f32,
    action: SimAction,
}

// Scripted timeline, ordered by time.
#[derive(Resource)]
pub struct Scenario {
    steps: Vec<SimStep>,
    next: usize,
    clock: f32,
}

impl Scenario {
    // Two bomb rounds: one detonation, one defuse partway into the
    // countdown. Spaced off the configured countdown length so the full
    // announce sequence plays out.
    #[must_use]
    pub fn two_round_demo(countdown_seconds: i32) -> Self {
        let count = countdown_seconds as f32;
        let explode_at = 3.0 + count;
        let round_two = explode_at + 4.0;
        let plant_two = round_two + 2.0;
        let defuse_at = plant_two + (count / 2.0).max(1.0);

        let step = |at_secs: f32, action: SimAction| SimStep { at_secs, action };
        let steps = vec![
            step(0.5, SimAction::Join { id: 1, name: "alice", team: Team::Ct, bot: false }),
            step(0.5, SimAction::Join { id: 2, name: "boris", team: Team::Terrorist, bot: false }),
            step(0.5, SimAction::Join { id: 3, name: "carol", team: Team::Ct, bot: false }),
            step(0.5, SimAction::Join { id: 4, name: "dmitri", team: Team::Terrorist, bot: false }),
            step(0.5, SimAction::Join { id: 5, name: "yuri (bot)", team: Team::Terrorist, bot: true }),
            step(1.0, SimAction::StartRound),
            step(3.0, SimAction::PlantBomb),
            step(explode_at, SimAction::ExplodeBomb),
            step(
                explode_at + 0.5,
                SimAction::EndRound { winner: Team::Terrorist, reason: REASON_TARGET_BOMBED },
            ),
            step(round_two, SimAction::StartRound),
            step(round_two + 0.5, SimAction::Leave { id: 4 }),
            step(plant_two, SimAction::PlantBomb),
            step(defuse_at, SimAction::DefuseBomb),
            step(
                defuse_at + 0.5,
                SimAction::EndRound { winner: Team::Ct, reason: REASON_BOMB_DEFUSED },
            ),
            step(defuse_at + 5.0, SimAction::Finish),
        ];
        Self { steps, next: 0, clock: 0.0 }
    }
}

// Flipped by the scenario's final step; main exits once set.
#[derive(Resource, Default)]
pub struct SimComplete(pub bool);

// A fake client: holds the receiving end of the channel a real client would
// execute commands from.
struct FakeClient {
    id: PlayerId,
    name: String,
    commands: UnboundedReceiver<ClientCommand>,
}

#[derive(Resource, Default)]
pub struct ClientSinks(Vec<FakeClient>);

pub struct SimPlugin {
    pub countdown_seconds: i32,
}

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerJoined>()
            .add_event::<PlayerLeft>()
            .add_event::<BombPlanted>()
            .add_event::<BombDefused>()
            .add_event::<BombExploded>()
            .add_event::<RoundStart>()
            .add_event::<RoundEnd>()
            .init_resource::<PlayerRoster>()
            .init_resource::<ClientSinks>()
            .init_resource::<SimComplete>()
            .insert_resource(Scenario::two_round_demo(self.countdown_seconds))
            .add_systems(Update, (scenario_system, roster_system, client_sink_system).chain());
    }
}

// ============================================================================
// Simulation Systems
// ============================================================================

// Emit every scripted action whose time has come.
pub fn scenario_system(
    time: Res<Time>,
    mut scenario: ResMut<Scenario>,
    mut sinks: ResMut<ClientSinks>,
    mut complete: ResMut<SimComplete>,
    mut joined: EventWriter<PlayerJoined>,
    mut left: EventWriter<PlayerLeft>,
    mut round_start: EventWriter<RoundStart>,
    mut planted: EventWriter<BombPlanted>,
    mut defused: EventWriter<BombDefused>,
    mut exploded: EventWriter<BombExploded>,
    mut round_end: EventWriter<RoundEnd>,
) {
    scenario.clock += time.delta_secs();

    loop {
        let Some(step) = scenario.steps.get(scenario.next) else {
            break;
        };
        if step.at_secs > scenario.clock {
            break;
        }
        match &step.action {
            SimAction::Join { id, name, team, bot } => {
                let (tx, rx) = unbounded_channel();
                sinks.0.push(FakeClient {
                    id: PlayerId(*id),
                    name: (*name).to_string(),
                    commands: rx,
                });
                joined.send(PlayerJoined {
                    id: PlayerId(*id),
                    name: (*name).to_string(),
                    team: *team,
                    bot: *bot,
                    channel: tx,
                });
            }
            SimAction::Leave { id } => {
                left.send(PlayerLeft { id: PlayerId(*id) });
            }
            SimAction::StartRound => {
                info!("scenario: round started");
                round_start.send(RoundStart);
            }
            SimAction::PlantBomb => {
                info!("scenario: bomb planted");
                planted.send(BombPlanted);
            }
            SimAction::DefuseBomb => {
                info!("scenario: bomb defused");
                defused.send(BombDefused);
            }
            SimAction::ExplodeBomb => {
                info!("scenario: bomb exploded");
                exploded.send(BombExploded);
            }
            SimAction::EndRound { winner, reason } => {
                info!(winner = ?winner, "scenario: round over");
                round_end.send(RoundEnd {
                    winner: *winner,
                    reason: *reason,
                });
            }
            SimAction::Finish => {
                info!("scenario: complete");
                complete.0 = true;
            }
        }
        scenario.next += 1;
    }
}

// Apply joins and leaves to the roster.
pub fn roster_system(
    mut roster: ResMut<PlayerRoster>,
    mut joined: EventReader<PlayerJoined>,
    mut left: EventReader<PlayerLeft>,
) {
    for event in joined.read() {
        info!(player = event.id.0, name = %event.name, bot = event.bot, "player connected");
        roster.0.insert(
            event.id,
            PlayerInfo {
                name: event.name.clone(),
                team: event.team,
                bot: event.bot,
                channel: event.channel.clone(),
            },
        );
    }
    for event in left.read() {
        if roster.0.remove(&event.id).is_some() {
            info!(player = event.id.0, "player disconnected");
        }
    }
}

// Drain each fake client's channel, logging what a real client would do.
pub fn client_sink_system(mut sinks: ResMut<ClientSinks>) {
    for client in &mut sinks.0 {
        while let Ok(command) = client.commands.try_recv() {
            match command {
                ClientCommand::Chat(text) => {
                    info!(client = %client.name, id = client.id.0, "chat: {text}");
                }
                ClientCommand::PlaySound { path, volume } => {
                    info!(client = %client.name, id = client.id.0, %path, volume, "play sound");
                }
            }
        }
    }
}
