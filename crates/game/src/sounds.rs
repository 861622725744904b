use engine::SoundId;

pub const FOOTSTEP: SoundId = SoundId("footstep.ogg");
pub const SILENCED: SoundId = SoundId("silenced.ogg");
pub const HEADSHOT: SoundId = SoundId("headshot.ogg");
