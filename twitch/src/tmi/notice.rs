use super::channel_name;
use crate::irc::{self, Result};

macro_rules! notice_types {
    ($($variant:ident => $id:literal,)*) => {
        /// Known values of the `msg-id` tag on `NOTICE`.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum NoticeType {
            $($variant,)*
            /// Absent or not (yet) known `msg-id`
            Unknown,
        }

        impl NoticeType {
            pub fn from_msg_id(id: &str) -> NoticeType {
                match id {
                    $($id => NoticeType::$variant,)*
                    _ => NoticeType::Unknown,
                }
            }

            pub fn msg_id(&self) -> Option<&'static str> {
                match self {
                    $(NoticeType::$variant => Some($id),)*
                    NoticeType::Unknown => None,
                }
            }
        }
    };
}

notice_types! {
    AlreadyBanned => "already_banned",
    AlreadyEmoteOnlyOff => "already_emote_only_off",
    AlreadyEmoteOnlyOn => "already_emote_only_on",
    AlreadyFollowersOff => "already_followers_off",
    AlreadyFollowersOn => "already_followers_on",
    AlreadyR9kOff => "already_r9k_off",
    AlreadyR9kOn => "already_r9k_on",
    AlreadySlowOff => "already_slow_off",
    AlreadySlowOn => "already_slow_on",
    AlreadySubsOff => "already_subs_off",
    AlreadySubsOn => "already_subs_on",
    AutohostReceive => "autohost_receive",
    BadBanAdmin => "bad_ban_admin",
    BadBanAnon => "bad_ban_anon",
    BadBanBroadcaster => "bad_ban_broadcaster",
    BadBanMod => "bad_ban_mod",
    BadBanSelf => "bad_ban_self",
    BadBanStaff => "bad_ban_staff",
    BadCommercialError => "bad_commercial_error",
    BadDeleteMessageBroadcaster => "bad_delete_message_broadcaster",
    BadDeleteMessageMod => "bad_delete_message_mod",
    BadHostError => "bad_host_error",
    BadHostHosting => "bad_host_hosting",
    BadHostRateExceeded => "bad_host_rate_exceeded",
    BadHostRejected => "bad_host_rejected",
    BadHostSelf => "bad_host_self",
    BadModBanned => "bad_mod_banned",
    BadModMod => "bad_mod_mod",
    BadSlowDuration => "bad_slow_duration",
    BadTimeoutAdmin => "bad_timeout_admin",
    BadTimeoutAnon => "bad_timeout_anon",
    BadTimeoutBroadcaster => "bad_timeout_broadcaster",
    BadTimeoutDuration => "bad_timeout_duration",
    BadTimeoutMod => "bad_timeout_mod",
    BadTimeoutSelf => "bad_timeout_self",
    BadTimeoutStaff => "bad_timeout_staff",
    BadUnbanNoBan => "bad_unban_no_ban",
    BadUnhostError => "bad_unhost_error",
    BadUnmodMod => "bad_unmod_mod",
    BadVipGranteeAlreadyVip => "bad_vip_grantee_already_vip",
    BadVipGranteeBanned => "bad_vip_grantee_banned",
    BanSuccess => "ban_success",
    CmdsAvailable => "cmds_available",
    ColorChanged => "color_changed",
    CommercialSuccess => "commercial_success",
    DeleteMessageSuccess => "delete_message_success",
    EmoteOnlyOff => "emote_only_off",
    EmoteOnlyOn => "emote_only_on",
    FollowersOff => "followers_off",
    FollowersOn => "followers_on",
    FollowersOnZero => "followers_on_zero",
    HostOff => "host_off",
    HostOn => "host_on",
    HostReceive => "host_receive",
    HostReceiveNoCount => "host_receive_no_count",
    HostTargetWentOffline => "host_target_went_offline",
    HostsRemaining => "hosts_remaining",
    InvalidUser => "invalid_user",
    ModSuccess => "mod_success",
    MsgBanned => "msg_banned",
    MsgBadCharacters => "msg_bad_characters",
    MsgChannelBlocked => "msg_channel_blocked",
    MsgChannelSuspended => "msg_channel_suspended",
    MsgDuplicate => "msg_duplicate",
    MsgEmoteOnly => "msg_emoteonly",
    MsgFollowersOnly => "msg_followersonly",
    MsgFollowersOnlyFollowed => "msg_followersonly_followed",
    MsgFollowersOnlyZero => "msg_followersonly_zero",
    MsgR9k => "msg_r9k",
    MsgRatelimit => "msg_ratelimit",
    MsgRejected => "msg_rejected",
    MsgRejectedMandatory => "msg_rejected_mandatory",
    MsgRequiresVerifiedPhoneNumber => "msg_requires_verified_phone_number",
    MsgSlowMode => "msg_slowmode",
    MsgSubsOnly => "msg_subsonly",
    MsgSuspended => "msg_suspended",
    MsgTimedOut => "msg_timedout",
    MsgVerifiedEmail => "msg_verified_email",
    NoHelp => "no_help",
    NoMods => "no_mods",
    NoPermission => "no_permission",
    NoVips => "no_vips",
    NotHosting => "not_hosting",
    R9kOff => "r9k_off",
    R9kOn => "r9k_on",
    RaidErrorAlreadyRaiding => "raid_error_already_raiding",
    RaidErrorForbidden => "raid_error_forbidden",
    RaidErrorSelf => "raid_error_self",
    RaidErrorTooManyViewers => "raid_error_too_many_viewers",
    RaidErrorUnexpected => "raid_error_unexpected",
    RaidNoticeMature => "raid_notice_mature",
    RaidNoticeRestrictedChat => "raid_notice_restricted_chat",
    RoomMods => "room_mods",
    SlowOff => "slow_off",
    SlowOn => "slow_on",
    SubsOff => "subs_off",
    SubsOn => "subs_on",
    TimeoutNoTimeout => "timeout_no_timeout",
    TimeoutSuccess => "timeout_success",
    TosBan => "tos_ban",
    TurboOnlyColor => "turbo_only_color",
    UnavailableCommand => "unavailable_command",
    UnbanSuccess => "unban_success",
    UnmodSuccess => "unmod_success",
    UnraidErrorNoActiveRaid => "unraid_error_no_active_raid",
    UnraidErrorUnexpected => "unraid_error_unexpected",
    UnraidSuccess => "unraid_success",
    UnrecognizedCmd => "unrecognized_cmd",
    UntimeoutBanned => "untimeout_banned",
    UntimeoutSuccess => "untimeout_success",
    UnvipSuccess => "unvip_success",
    VipSuccess => "vip_success",
    VipsSuccess => "vips_success",
    WhisperBanned => "whisper_banned",
    WhisperBannedRecipient => "whisper_banned_recipient",
    WhisperInvalidLogin => "whisper_invalid_login",
    WhisperInvalidSelf => "whisper_invalid_self",
    WhisperLimitPerMin => "whisper_limit_per_min",
    WhisperLimitPerSec => "whisper_limit_per_sec",
    WhisperRestricted => "whisper_restricted",
    WhisperRestrictedRecipient => "whisper_restricted_recipient",
}

/// `NOTICE`
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeType,
    /// The raw `msg-id`, also kept when it maps to [`NoticeType::Unknown`]
    pub msg_id: Option<String>,
    /// Without the leading `#`, or `*` when no channel was addressed
    pub channel: String,
    pub message: String,
}

impl Notice {
    pub(crate) fn decode(msg: &irc::Message<'_>) -> Result<Notice> {
        let msg_id = msg.tags.get_str("msg-id");
        let kind = match &msg_id {
            Some(id) => NoticeType::from_msg_id(id),
            None => NoticeType::Unknown,
        };
        if kind == NoticeType::Unknown {
            if let Some(id) = &msg_id {
                log::debug!("Unknown NOTICE msg-id '{}'", id);
            }
        }
        let channel = match msg.params.middle.first() {
            Some(param) => channel_name(param).to_ascii_lowercase(),
            None => "*".to_owned(),
        };

        Ok(Notice {
            kind,
            msg_id: msg_id.map(|id| id.into_owned()),
            channel,
            message: msg.params.trailing().unwrap_or_default().to_owned(),
        })
    }
}
