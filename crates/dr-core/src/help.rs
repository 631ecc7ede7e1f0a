//! Help texts shown by the `bcdice` keyword commands.

/// Reply to `bcdice`, `bcdice help` and unknown subcommands.
pub const GENERAL_HELP: &str = "\
[How to use the dice bot]
# Show the current status
bcdice status

# Change the game system for this channel
bcdice set SYSTEM_NAME
example: bcdice set AceKillerGene

# List every game system
bcdice list

# Show help for a game system or dice table
bcdice help SYSTEM_NAME

# Store a memo and get its index back
bcdice save TEXT

# Recall a secret roll or a memo
bcdice load INDEX

# Admin commands
bcdice admin help

[Rolling]
2d6+1 : roll with the channel's system
3 2d6 : roll three times
[a,b,c] 1d100 : roll once per name
S2d6 : secret roll, the result arrives by direct message";

/// Reply to `bcdice admin help` and unknown admin subcommands.
pub const ADMIN_HELP: &str = "\
[Admin commands]
bcdice admin PASSWORD listServer
bcdice admin PASSWORD setServer URL
bcdice admin PASSWORD removeServer URL
bcdice admin PASSWORD export
bcdice admin PASSWORD import
ROOM_ID:SYSTEM_NAME
ROOM_ID:SYSTEM_NAME
bcdice admin PASSWORD suppressroll
bcdice admin PASSWORD suppressroll /PREFIX
bcdice admin PASSWORD suppressroll disable
bcdice admin PASSWORD addDiceBot [NAME] (attach the table file)
bcdice admin PASSWORD removeDiceBot NAME
bcdice admin PASSWORD listDiceBot

Secret roll keys are meant to be recalled within 72 hours.";

/// Usage error for `bcdice set` without a system name.
pub const SET_USAGE: &str = "\
[ERROR] To change the game system: bcdice set SYSTEM_NAME
example: bcdice set AceKillerGene";
